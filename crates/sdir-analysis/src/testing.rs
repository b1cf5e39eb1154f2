//! Deterministic decomposer for tests.
//!
//! Splits the script one scene per narrative line, picks the city and era
//! with simple heuristics and writes a five-facet prompt that names both.
//! No network access.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::contract::{AnalysisResponse, ContextPayload, ScenePayload};
use crate::decomposer::SceneDecomposer;
use crate::error::{AnalysisError, AnalysisResult};
use crate::headers::{classify_line, LineKind};
use crate::template::PromptTemplate;

const STUB_STYLE_GUIDE: &str = "Cinematic historical realism";
const STUB_PLACEHOLDER_CITY: &str = "Unidentified city";
const STUB_PLACEHOLDER_ERA: &str = "Unspecified era";
const LOCATION_PREPOSITIONS: &[&str] = &["in", "of", "at", "from"];

/// Offline [`SceneDecomposer`].
#[derive(Debug, Clone, Default)]
pub struct StubDecomposer {
    failure: Option<AnalysisError>,
    delay: Option<Duration>,
}

impl StubDecomposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A decomposer that always fails with `error`.
    pub fn failing(error: AnalysisError) -> Self {
        Self {
            failure: Some(error),
            delay: None,
        }
    }

    /// A decomposer that sleeps before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            failure: None,
            delay: Some(delay),
        }
    }
}

#[async_trait]
impl SceneDecomposer for StubDecomposer {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn decompose(
        &self,
        script: &str,
        template: &PromptTemplate,
    ) -> AnalysisResult<AnalysisResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let city = detect_city(script).unwrap_or_else(|| STUB_PLACEHOLDER_CITY.to_string());
        let era = detect_era(script).unwrap_or_else(|| STUB_PLACEHOLDER_ERA.to_string());

        let scenes = script
            .lines()
            .filter(|line| classify_line(line) == LineKind::Narrative)
            .map(|line| ScenePayload {
                text: line.trim().to_string(),
                visual_prompt: stub_prompt(&era, &city, line.trim(), template),
            })
            .collect();

        Ok(AnalysisResponse {
            context: ContextPayload {
                detected_city: city,
                detected_era: era,
                visual_style_guide: STUB_STYLE_GUIDE.to_string(),
            },
            scenes,
        })
    }
}

fn stub_prompt(era: &str, city: &str, line: &str, template: &PromptTemplate) -> String {
    let camera = if template.mode.requires_motion() {
        "slow dolly-in, subtle motion of fog and figures"
    } else {
        "still image, wide establishing frame"
    };
    format!(
        "{era}, {city}. Subject: {line} Lighting: low golden light through haze. \
         Camera: {camera}. Atmosphere: {STUB_STYLE_GUIDE}. Details: period-accurate \
         architecture and clothing, 16:9."
    )
}

/// Most frequent capitalized word following a location preposition.
/// Ties go to the first mention.
fn detect_city(script: &str) -> Option<String> {
    let words: Vec<&str> = script.split_whitespace().collect();
    let candidates = words.windows(2).filter_map(|pair| {
        if !LOCATION_PREPOSITIONS.contains(&pair[0].to_lowercase().as_str()) {
            return None;
        }
        let word = pair[1].trim_matches(|c: char| !c.is_alphanumeric());
        word.chars()
            .next()
            .filter(|c| c.is_uppercase())
            .map(|_| word.to_string())
    });
    most_frequent(candidates)
}

/// Most frequent three- or four-digit number. Ties go to the first mention.
fn detect_era(script: &str) -> Option<String> {
    let candidates = script
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| (3..=4).contains(&run.len()))
        .map(str::to_string);
    most_frequent(candidates)
}

fn most_frequent(items: impl Iterator<Item = String>) -> Option<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, item) in items.enumerate() {
        counts.entry(item).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(item, _)| item)
}
