use ordtrener::audio::{AudioRequest, Chime};
use ordtrener::cloze::HeuristicInflection;
use ordtrener::cloze::distractors::{ClozeTarget, cloze_distractors};
use ordtrener::config::GameRules;
use ordtrener::dataset::source::load_embedded;
use ordtrener::dataset::{CefrLevel, Dataset, WordEntry};
use ordtrener::session::{GameEvent, Question, WordGame};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const WRONG: &str = "definitely not an option";

fn sample() -> Dataset {
    load_embedded().unwrap().0
}

fn answer_correctly(game: &mut WordGame, question: &Question) {
    let answer = question.correct_option.clone();
    assert!(game.submit_answer(question, &answer).correct);
}

#[test]
fn test_ten_correct_answers_promote_a1_to_a2() {
    for seed in 0..5 {
        let mut game = WordGame::with_seed(sample(), GameRules::default(), CefrLevel::A1, seed);
        for _ in 0..10 {
            let q = game.next_question().unwrap();
            assert_eq!(q.word.cefr, Some(CefrLevel::A1));
            answer_correctly(&mut game, &q);
        }
        let stats = game.stats();
        assert_eq!(stats.level, CefrLevel::A2);
        assert_eq!(stats.level_questions, 0);
        assert_eq!(stats.level_correct, 0);
        assert_eq!(stats.streak, 10);
        assert!(game.take_events().contains(&GameEvent::LevelUp(CefrLevel::A2)));
        assert_eq!(game.next_question().unwrap().word.cefr, Some(CefrLevel::A2));
    }
}

#[test]
fn test_same_class_candidate_gets_same_suffix() {
    let dataset = Dataset::new(vec![
        WordEntry::new("bok", "book", "en", CefrLevel::A1),
        WordEntry::new("katt", "cat", "en", CefrLevel::A1),
    ]);
    let target = ClozeTarget {
        headword: "bok",
        clozed_form: "boken",
        level: Some(CefrLevel::A1),
        part_of_speech: "en",
    };
    let mut rng = SmallRng::seed_from_u64(0);
    let wrong = cloze_distractors(
        &dataset,
        &target,
        &HeuristicInflection,
        &GameRules::default(),
        &mut rng,
    );
    assert_eq!(wrong, vec!["katten".to_string()]);
}

#[test]
fn test_missed_word_returns_and_leaves_after_correct_answer() {
    let rules = GameRules {
        reintroduce_spacing: 2,
        reintroduce_miss_threshold: 2,
        ..GameRules::default()
    };
    let mut game = WordGame::with_seed(sample(), rules, CefrLevel::A1, 3);
    game.toggle_lock();

    let missed = game.next_question().unwrap();
    assert!(!game.submit_answer(&missed, WRONG).correct);
    assert_eq!(game.state().review.len(), 1);

    // not shown again yet, so a correct answer does not resolve it
    answer_correctly(&mut game, &missed);
    assert_eq!(game.state().review.len(), 1);
    game.take_events();
    game.take_audio_requests();

    let mut returned = false;
    for _ in 0..10 {
        let q = game.next_question().unwrap();
        if q.is_reintroduced {
            assert_eq!(q.word.headword, missed.word.headword);
            assert!(
                game.take_audio_requests()
                    .contains(&AudioRequest::Chime(Chime::Pop))
            );
            answer_correctly(&mut game, &q);
            returned = true;
            break;
        }
        answer_correctly(&mut game, &q);
    }
    assert!(returned);
    assert!(game.state().review.is_empty());
    assert!(game.take_events().contains(&GameEvent::QueueCleared));
}

#[test]
fn test_strict_promotion_waits_for_empty_queue() {
    for strict in [true, false] {
        let rules = GameRules {
            strict_promotion: strict,
            reintroduce_spacing: 100,
            ..GameRules::default()
        };
        let mut game = WordGame::with_seed(sample(), rules, CefrLevel::A1, 8);
        let first = game.next_question().unwrap();
        game.submit_answer(&first, WRONG);
        for _ in 0..9 {
            let q = game.next_question().unwrap();
            answer_correctly(&mut game, &q);
        }
        let expected = if strict { CefrLevel::A1 } else { CefrLevel::A2 };
        assert_eq!(game.stats().level, expected, "strict = {strict}");
        assert_eq!(game.stats().level_questions, 0);
    }
}

#[test]
fn test_ten_wrong_answers_demote_and_clear_queue() {
    let mut game = WordGame::with_seed(sample(), GameRules::default(), CefrLevel::A2, 4);
    for _ in 0..10 {
        let q = game.next_question().unwrap();
        game.submit_answer(&q, WRONG);
    }
    assert_eq!(game.stats().level, CefrLevel::A1);
    assert!(game.state().review.is_empty());
    assert_eq!(game.stats().streak, 0);
    assert!(game.take_events().contains(&GameEvent::LevelDown(CefrLevel::A1)));
}

#[test]
fn test_lock_keeps_level_but_resets_counters() {
    let mut game = WordGame::with_seed(sample(), GameRules::default(), CefrLevel::A1, 5);
    assert!(game.toggle_lock());
    for _ in 0..10 {
        let q = game.next_question().unwrap();
        answer_correctly(&mut game, &q);
    }
    assert_eq!(game.stats().level, CefrLevel::A1);
    assert_eq!(game.stats().level_questions, 0);
    let events = game.take_events();
    assert!(events.contains(&GameEvent::LockToggled(true)));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp(_))));
}

#[test]
fn test_same_seed_same_session() {
    let run = |seed| {
        let mut game = WordGame::with_seed(sample(), GameRules::default(), CefrLevel::A1, seed);
        let mut seen = Vec::new();
        for i in 0..25 {
            let q = game.next_question().unwrap();
            seen.push((q.prompt().to_string(), q.options.clone()));
            if i % 3 == 0 {
                game.submit_answer(&q, WRONG);
            } else {
                answer_correctly(&mut game, &q);
            }
        }
        seen
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn test_cloze_falls_back_to_flashcard_without_example() {
    let dataset = Dataset::new(vec![
        WordEntry::new("hund", "dog", "en", CefrLevel::A1),
        WordEntry::new("katt", "cat", "en", CefrLevel::A1),
        WordEntry::new("gå", "walk", "verb", CefrLevel::A1).with_example("Vi gikk hjem.", "We walked home."),
    ]);
    let rules = GameRules {
        cloze_probability: 1.0,
        ..GameRules::default()
    };
    let mut game = WordGame::with_seed(dataset, rules, CefrLevel::A1, 6);
    for _ in 0..10 {
        let q = game.next_question().unwrap();
        assert!(!q.is_cloze(), "{} should be a flashcard", q.word.headword);
        assert_eq!(q.correct_option, q.word.translation);
        answer_correctly(&mut game, &q);
    }
}

#[test]
fn test_cloze_options_come_from_sentence() {
    let rules = GameRules {
        cloze_probability: 1.0,
        ..GameRules::default()
    };
    let mut game = WordGame::with_seed(sample(), rules, CefrLevel::A1, 9);
    let mut clozes = 0;
    for _ in 0..20 {
        let q = game.next_question().unwrap();
        if let Some(form) = q.clozed_form() {
            clozes += 1;
            assert!(q.prompt().contains("___"));
            assert_eq!(form.to_lowercase(), q.correct_option.to_lowercase());
            assert!(q.options.contains(&q.correct_option));
            assert!(q.options.len() <= 4);
        }
        answer_correctly(&mut game, &q);
    }
    assert!(clozes > 0);
}

#[test]
fn test_replace_dataset_keeps_streak() {
    let mut game = WordGame::with_seed(sample(), GameRules::default(), CefrLevel::A1, 10);
    let q = game.next_question().unwrap();
    answer_correctly(&mut game, &q);
    game.replace_dataset(Dataset::new(vec![
        WordEntry::new("sol", "sun", "en", CefrLevel::A1),
        WordEntry::new("måne", "moon", "en", CefrLevel::A1),
    ]));
    assert_eq!(game.stats().streak, 1);
    let q = game.next_question().unwrap();
    assert!(["sol", "måne"].contains(&q.word.headword.as_str()));
}

fn review_rules() -> GameRules {
    GameRules {
        cloze_probability: 1.0,
        reintroduce_spacing: 2,
        reintroduce_miss_threshold: 2,
        ..GameRules::default()
    }
}

/// Answers fresh questions correctly until a cloze comes up, then misses it.
fn miss_first_cloze(game: &mut WordGame) -> Question {
    for _ in 0..30 {
        let q = game.next_question().unwrap();
        if q.is_cloze() {
            assert!(!game.submit_answer(&q, WRONG).correct);
            return q;
        }
        answer_correctly(game, &q);
    }
    panic!("no cloze question in 30 draws");
}

fn wait_for_review(game: &mut WordGame) -> Question {
    for _ in 0..10 {
        let q = game.next_question().unwrap();
        if q.is_reintroduced {
            return q;
        }
        answer_correctly(game, &q);
    }
    panic!("missed word never came back");
}

#[test]
fn test_missed_cloze_returns_as_same_cloze() {
    for seed in 0..5 {
        let mut game = WordGame::with_seed(sample(), review_rules(), CefrLevel::A1, seed);
        game.toggle_lock();
        let missed = miss_first_cloze(&mut game);
        let form = missed.clozed_form().unwrap().to_lowercase();

        let q = wait_for_review(&mut game);
        assert_eq!(q.word.headword, missed.word.headword);
        assert!(q.is_cloze(), "seed {seed}: review should stay a cloze");
        assert_eq!(q.clozed_form().map(str::to_lowercase), Some(form));
        assert!(q.options.contains(&q.correct_option));
    }
}

#[test]
fn test_wrong_answer_on_review_keeps_single_shown_item() {
    let mut game = WordGame::with_seed(sample(), review_rules(), CefrLevel::A1, 13);
    game.toggle_lock();
    let missed = miss_first_cloze(&mut game);
    assert!(game.state().review.front().is_some_and(|i| !i.shown));

    let q = wait_for_review(&mut game);
    assert!(!game.submit_answer(&q, WRONG).correct);
    assert_eq!(game.state().review.len(), 1);
    let item = game.state().review.front().unwrap();
    assert!(item.shown);
    assert!(item.was_cloze);
    assert_eq!(item.word.headword, missed.word.headword);
}
