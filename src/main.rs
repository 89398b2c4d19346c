use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use ordtrener::app::{self, App};
use ordtrener::audio::sentence_audio_path;
use ordtrener::config::Config;
use ordtrener::dataset::{CefrLevel, WordEntry, lookup};
use ordtrener::event::{AppEvent, EventHandler};
use ordtrener::pronunciation;
use ordtrener::session::{AnswerOutcome, Question, QuestionMode};
use ordtrener::stories::StoryFilter;

#[derive(Parser)]
#[command(name = "ordtrener", version, about = "Adaptive Norwegian vocabulary trainer")]
struct Cli {
    #[arg(long, global = true, help = "Message language (en, nb)")]
    locale: Option<String>,

    #[arg(long, global = true, help = "CSV word list to use instead of the configured source")]
    dataset: Option<PathBuf>,

    #[arg(long, global = true, help = "URL of a published CSV word list")]
    url: Option<String>,

    #[arg(long, global = true, help = "CSV file of graded reader stories")]
    story_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play the adaptive word game
    Play {
        #[arg(short, long, help = "Starting level (A1, A2, B1, B2, C)")]
        level: Option<CefrLevel>,

        #[arg(short, long, help = "Part-of-speech filter (noun, verb, adjective, ..., all)")]
        pos: Option<String>,

        #[arg(long, help = "Seed for a reproducible session")]
        seed: Option<u64>,

        #[arg(long, help = "Stay at the starting level")]
        lock: bool,
    },
    /// Search headwords and translations
    Lookup { query: String },
    /// Show a random dictionary entry
    Random,
    /// Show a random sentence to practise pronouncing, or score a recording
    Pronounce {
        #[arg(short, long)]
        level: Option<CefrLevel>,

        #[arg(long, requires = "recording", help = "WAV file of the native speaker")]
        native: Option<PathBuf>,

        #[arg(long, requires = "native", help = "WAV file of your attempt")]
        recording: Option<PathBuf>,
    },
    /// List reader stories, optionally by genre and level
    Stories {
        #[arg(short, long)]
        genre: Option<String>,

        #[arg(short, long)]
        level: Option<CefrLevel>,
    },
    /// Read a story sentence by sentence next to its translation
    Story {
        title: String,

        #[arg(long, help = "Show only the Norwegian text")]
        hide_english: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(path) = cli.dataset {
        config.dataset_path = Some(path);
    }
    if let Some(url) = cli.url {
        config.dataset_url = Some(url);
    }
    if let Some(path) = cli.story_file {
        config.stories_path = Some(path);
    }
    config.normalize();
    ordtrener::set_locale(&config.locale);

    match cli.command.unwrap_or(Command::Play {
        level: None,
        pos: None,
        seed: None,
        lock: false,
    }) {
        Command::Play {
            level,
            pos,
            seed,
            lock,
        } => {
            if let Some(level) = level {
                config.start_level = level;
            }
            if pos.is_some() {
                config.part_of_speech = pos;
                config.normalize();
            }
            play(config, seed, lock)
        }
        Command::Lookup { query } => {
            let (dataset, _) = app::load_dataset(&config)?;
            let hits = lookup::search(&dataset, &query);
            if hits.is_empty() {
                bail!("no entries match {query:?}");
            }
            for entry in hits {
                print_entry(entry);
            }
            Ok(())
        }
        Command::Random => {
            let (dataset, _) = app::load_dataset(&config)?;
            let mut rng = SmallRng::from_entropy();
            match lookup::random_entry(&dataset, &mut rng) {
                Some(entry) => print_entry(entry),
                None => bail!("the dataset is empty"),
            }
            Ok(())
        }
        Command::Pronounce {
            native: Some(native),
            recording: Some(recording),
            ..
        } => {
            let score = pronunciation::score_files(&native, &recording)?;
            println!("{}", app::score_text(score));
            Ok(())
        }
        Command::Pronounce { level, .. } => {
            let (dataset, _) = app::load_dataset(&config)?;
            let mut rng = SmallRng::from_entropy();
            let Some(entry) = pronunciation::random_practice(&dataset, level, &mut rng) else {
                bail!("no recorded sentences available");
            };
            let sentence = entry.example.as_deref().unwrap_or_default();
            println!("{sentence}");
            if let Some(translation) = &entry.sentence_translation {
                println!("  {translation}");
            }
            println!("  audio: {}", sentence_audio_path(sentence));
            Ok(())
        }
        Command::Stories { genre, level } => {
            let library = app::load_stories(&config)?;
            let hits = library.filter(&StoryFilter { genre, level });
            if hits.is_empty() {
                bail!(
                    "no stories match, genres available: {}",
                    library.genres().join(", ")
                );
            }
            for story in hits {
                let level = story.cefr.map(|l| l.as_str()).unwrap_or("-");
                println!(
                    "{} / {} ({}, {level})",
                    story.title_norwegian, story.title_english, story.genre
                );
            }
            Ok(())
        }
        Command::Story {
            title,
            hide_english,
        } => {
            let library = app::load_stories(&config)?;
            let Some(story) = library.find(&title) else {
                bail!("no story titled {title:?}");
            };
            println!("{}", story.title_norwegian);
            if !hide_english && !story.title_english.is_empty() {
                println!("  {}", story.title_english);
            }
            for pair in story.sentences() {
                println!();
                println!("{}", pair.norwegian);
                if !hide_english && !pair.english.is_empty() {
                    println!("  {}", pair.english);
                }
            }
            Ok(())
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn play(config: Config, seed: Option<u64>, lock: bool) -> Result<()> {
    let mut app = App::new(config, seed)?;
    if lock {
        app.toggle_lock();
    }
    print_messages(&mut app);
    let events = EventHandler::new();

    while !app.should_quit {
        let Some(question) = app.next_question() else {
            println!("{}", app::no_words_text());
            break;
        };
        print_question(question);

        loop {
            let line = match events.next()? {
                AppEvent::Line(line) => line,
                AppEvent::Eof => {
                    app.should_quit = true;
                    break;
                }
            };
            match line.as_str() {
                "q" => {
                    app.should_quit = true;
                    break;
                }
                "l" => {
                    app.toggle_lock();
                    print_messages(&mut app);
                }
                choice => match choice.parse::<usize>() {
                    Ok(n) if n >= 1 => match app.answer(n - 1) {
                        Ok(outcome) => {
                            print_outcome(&outcome);
                            print_messages(&mut app);
                            break;
                        }
                        Err(e) => println!("{e}"),
                    },
                    _ => println!("{}", app::prompt_text()),
                },
            }
        }
    }

    let stats = app.game.stats();
    println!(
        "{}/{} correct, best streak {}, level {}",
        stats.total_correct, stats.total_questions, stats.best_streak, stats.level
    );
    Ok(())
}

fn print_question(question: &Question) {
    let review = if question.is_reintroduced { " (review)" } else { "" };
    println!();
    println!("{}{review}", question.prompt());
    if let QuestionMode::Cloze {
        sentence_translation: Some(translation),
        ..
    } = &question.mode
    {
        println!("  ({translation})");
    }
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
}

fn print_outcome(outcome: &AnswerOutcome) {
    println!("{}", app::feedback(outcome));
    let explanation = &outcome.explanation;
    if let Some(sentence) = &explanation.sentence {
        println!("  {sentence}");
    }
    if let Some(translation) = &explanation.sentence_translation {
        println!("  {translation}");
    }
}

fn print_messages<A: ordtrener::audio::AudioSink>(app: &mut App<A>) {
    for message in app.messages() {
        println!("** {message} **");
    }
}

fn print_entry(entry: &WordEntry) {
    let level = entry.cefr.map(|l| l.as_str()).unwrap_or("-");
    println!(
        "{} ({}, {level}): {}",
        entry.headword, entry.part_of_speech, entry.translation
    );
    if let Some(pronunciation) = &entry.pronunciation {
        println!("  /{pronunciation}/");
    }
    if let Some(definition) = &entry.definition {
        println!("  {definition}");
    }
    if let Some(example) = &entry.example {
        println!("  {example}");
    }
    if let Some(translation) = &entry.sentence_translation {
        println!("  {translation}");
    }
    if let Some(etymology) = &entry.etymology {
        println!("  etym.: {etymology}");
    }
}
