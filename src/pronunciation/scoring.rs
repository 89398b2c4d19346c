/// Per-frame features: RMS energy and zero-crossing rate, both scaled to 0..=1.
pub type Feature = [f64; 2];

pub const DEFAULT_FRAMES: usize = 200;
const DTW_SCALE: f64 = 250.0;
const DTW_WEIGHT: f64 = 0.8;
const SILENCE_ENERGY: f64 = 1e-5;

/// Splits `samples` into `frames` equal blocks and measures each. Fewer
/// samples than frames gives one frame per sample.
pub fn extract_features(samples: &[f32], frames: usize) -> Vec<Feature> {
    let frames = frames.min(samples.len());
    if frames == 0 {
        return Vec::new();
    }
    let block = samples.len() / frames;

    let raw: Vec<Feature> = samples
        .chunks_exact(block)
        .take(frames)
        .map(|chunk| {
            let energy: f64 = chunk.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
            let crossings = chunk
                .windows(2)
                .filter(|pair| (pair[0] > 0.0) != (pair[1] > 0.0))
                .count();
            [
                (energy / block as f64).sqrt(),
                crossings as f64 / block as f64,
            ]
        })
        .collect();

    let max_of = |dim: usize| {
        let max = raw.iter().map(|f| f[dim]).fold(0.0, f64::max);
        if max > 0.0 { max } else { 1.0 }
    };
    let (max_energy, max_zcr) = (max_of(0), max_of(1));
    raw.into_iter()
        .map(|[e, z]| [e / max_energy, z / max_zcr])
        .collect()
}

/// Dynamic time warping cost with Euclidean frame distance, divided by the
/// combined length so long and short clips compare.
pub fn dtw_distance(a: &[Feature], b: &[Feature]) -> f64 {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return f64::INFINITY;
    }
    let mut previous = vec![f64::INFINITY; m + 1];
    let mut current = vec![f64::INFINITY; m + 1];
    previous[0] = 0.0;

    for fa in a {
        current[0] = f64::INFINITY;
        for (j, fb) in b.iter().enumerate() {
            let cost = (fa[0] - fb[0]).hypot(fa[1] - fb[1]);
            current[j + 1] = cost + previous[j + 1].min(current[j]).min(previous[j]);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[m] / (n + m) as f64
}

/// Pearson correlation of the energy contours over their common length.
pub fn energy_correlation(a: &[Feature], b: &[Feature]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let mean_a = a[..len].iter().map(|f| f[0]).sum::<f64>() / len as f64;
    let mean_b = b[..len].iter().map(|f| f[0]).sum::<f64>() / len as f64;

    let (mut num, mut den_a, mut den_b) = (0.0, 0.0, 0.0);
    for (fa, fb) in a[..len].iter().zip(&b[..len]) {
        let da = fa[0] - mean_a;
        let db = fb[0] - mean_b;
        num += da * db;
        den_a += da * da;
        den_b += db * db;
    }
    let den = (den_a * den_b).sqrt();
    num / if den > 0.0 { den } else { 1.0 }
}

fn mean_energy(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples
        .iter()
        .map(|&s| f64::from(s) * f64::from(s))
        .sum::<f64>()
        / samples.len() as f64
}

/// 0..=100 similarity between a native recording and the learner's attempt,
/// both mono PCM in -1.0..=1.0. Silence scores 0.
pub fn similarity_score(native: &[f32], user: &[f32]) -> u8 {
    if mean_energy(user) < SILENCE_ENERGY {
        log::debug!("recording is silent");
        return 0;
    }
    let native_features = extract_features(native, DEFAULT_FRAMES);
    let user_features = extract_features(user, native_features.len());
    if native_features.is_empty() || user_features.is_empty() {
        return 0;
    }

    let distance = dtw_distance(&native_features, &user_features);
    let correlation = energy_correlation(&native_features, &user_features);
    let dtw_score = (100.0 - distance * DTW_SCALE).max(0.0);
    let corr_score = ((correlation + 1.0) * 50.0).clamp(0.0, 100.0);
    let score = DTW_WEIGHT * dtw_score + (1.0 - DTW_WEIGHT) * corr_score;
    log::debug!("pronunciation dtw {distance:.4}, correlation {correlation:.3}, score {score:.1}");
    score.round().clamp(0.0, 100.0) as u8
}
