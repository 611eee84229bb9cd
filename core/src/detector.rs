use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Minimum score at which a pattern counts as detected.
pub const DETECTION_THRESHOLD: u8 = 25;
/// Scores are capped here no matter how many rules trigger.
pub const MAX_SCORE: u8 = 100;

/// The three canned deception patterns, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DeceptionPattern {
    /// Confident-sounding but substance-free language
    FacadeOfCompetence,
    /// Generic, non-specific restatement
    StochasticParroting,
    /// Over-cautious, disclaimer-laden responses
    SafetyHedging,
}

impl DeceptionPattern {
    /// Evaluation order. Ties on score resolve to the earlier entry.
    pub const ALL: [DeceptionPattern; 3] = [
        DeceptionPattern::FacadeOfCompetence,
        DeceptionPattern::StochasticParroting,
        DeceptionPattern::SafetyHedging,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeceptionPattern::FacadeOfCompetence => "facade-of-competence",
            DeceptionPattern::StochasticParroting => "stochastic-parroting",
            DeceptionPattern::SafetyHedging => "safety-hedging",
        }
    }
}

impl fmt::Display for DeceptionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence bucket derived from a pattern score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_score(score: u8) -> Self {
        if score >= 75 {
            Confidence::High
        } else if score >= 50 {
            Confidence::Medium
        } else if score >= DETECTION_THRESHOLD {
            Confidence::Low
        } else {
            Confidence::None
        }
    }
}

/// Outcome of one detector over one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DetectionResult {
    /// Which pattern this result scores
    pub pattern: DeceptionPattern,
    /// Sum of triggered rule weights, capped at 100
    pub score: u8,
    /// One entry per triggered rule, in rule evaluation order
    pub indicators: Vec<String>,
    pub confidence: Confidence,
    /// `score >= 25`
    pub detected: bool,
}

impl DetectionResult {
    /// Zero result for empty input.
    pub fn empty(pattern: DeceptionPattern) -> Self {
        Self::from_parts(pattern, 0, Vec::new())
    }

    fn from_parts(pattern: DeceptionPattern, raw_score: u32, indicators: Vec<String>) -> Self {
        let score = raw_score.min(u32::from(MAX_SCORE)) as u8;
        Self {
            pattern,
            score,
            indicators,
            confidence: Confidence::from_score(score),
            detected: score >= DETECTION_THRESHOLD,
        }
    }
}

/// Per-pattern results keyed by the fixed pattern identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AllPatterns {
    #[serde(rename = "facade-of-competence")]
    pub facade_of_competence: DetectionResult,
    #[serde(rename = "stochastic-parroting")]
    pub stochastic_parroting: DetectionResult,
    #[serde(rename = "safety-hedging")]
    pub safety_hedging: DetectionResult,
}

impl AllPatterns {
    pub fn get(&self, pattern: DeceptionPattern) -> &DetectionResult {
        match pattern {
            DeceptionPattern::FacadeOfCompetence => &self.facade_of_competence,
            DeceptionPattern::StochasticParroting => &self.stochastic_parroting,
            DeceptionPattern::SafetyHedging => &self.safety_hedging,
        }
    }

    /// Results in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &DetectionResult> {
        DeceptionPattern::ALL.into_iter().map(|p| self.get(p))
    }

    /// Left-to-right strict max scan: an equal score never displaces the
    /// earlier pattern.
    fn primary(&self) -> &DetectionResult {
        let mut primary = &self.facade_of_competence;
        for candidate in [&self.stochastic_parroting, &self.safety_hedging] {
            if candidate.score > primary.score {
                primary = candidate;
            }
        }
        primary
    }
}

/// Aggregate verdict over all three detectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Highest-scoring pattern (first in evaluation order on ties)
    pub primary_pattern: DeceptionPattern,
    pub all_patterns: AllPatterns,
    /// Maximum of the individual scores
    pub overall_score: u8,
    /// True if any individual detector fired
    pub detected: bool,
    /// The primary pattern if it was detected; serialized as `"none"` otherwise
    #[serde(serialize_with = "serialize_recommendation")]
    #[schema(value_type = String, example = "facade-of-competence")]
    pub recommendation: Option<DeceptionPattern>,
}

impl AnalysisResult {
    /// Every indicator across all patterns, prefixed with the pattern id.
    pub fn flattened_indicators(&self) -> Vec<String> {
        self.all_patterns
            .iter()
            .flat_map(|r| {
                r.indicators
                    .iter()
                    .map(move |i| format!("{}: {i}", r.pattern))
            })
            .collect()
    }
}

fn serialize_recommendation<S: Serializer>(
    value: &Option<DeceptionPattern>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.map_or("none", DeceptionPattern::as_str))
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Counts case-insensitive, word-bounded phrase matches. Each phrase is a
/// regex fragment; matches are counted per phrase and summed.
#[derive(Debug)]
pub struct PhraseRule {
    /// Indicator prefix; the count is appended as ` (N instances)`
    pub label: &'static str,
    pub phrases: &'static [&'static str],
    pub threshold: usize,
    pub weight: u32,
}

/// Fires when too few sentences carry concrete detail.
#[derive(Debug)]
pub struct SpecificityRule {
    /// Only texts with at least this many sentences are judged
    pub min_sentences: usize,
    /// Fires when the share of specific sentences is below this
    pub min_ratio: f64,
    pub weight: u32,
    pub indicator: &'static str,
}

#[derive(Debug)]
pub enum Rule {
    Phrases(PhraseRule),
    Specificity(SpecificityRule),
}

pub static FACADE_OF_COMPETENCE_RULES: &[Rule] = &[
    Rule::Phrases(PhraseRule {
        label: "Excessive politeness",
        phrases: &[
            "I understand",
            "I appreciate",
            "thank you for",
            "I apologize",
            "happy to help",
            "glad to assist",
        ],
        threshold: 3,
        weight: 25,
    }),
    Rule::Phrases(PhraseRule {
        label: "Excessive assurance phrases",
        phrases: &[
            "certainly",
            "definitely",
            "absolutely",
            "of course",
            "without a doubt",
        ],
        threshold: 2,
        weight: 20,
    }),
    Rule::Phrases(PhraseRule {
        label: "Excessive jargon without substance",
        phrases: &[
            "leverag(?:e|ing)",
            "synerg(?:y|ies)",
            "paradigm",
            "holistic",
            "optimiz(?:e|ation)",
            "streamlin(?:e|ing)",
            "best practices",
        ],
        threshold: 3,
        weight: 30,
    }),
    Rule::Phrases(PhraseRule {
        label: "Vague future commitments",
        phrases: &[
            "will look into",
            "will investigate",
            "will consider",
            "will explore",
            "in the future",
            "down the road",
        ],
        threshold: 2,
        weight: 25,
    }),
];

pub static STOCHASTIC_PARROTING_RULES: &[Rule] = &[
    Rule::Phrases(PhraseRule {
        label: "Repetitive referencing",
        phrases: &[
            "as mentioned",
            "as stated",
            "as you said",
            "as you mentioned",
            "like you said",
        ],
        threshold: 2,
        weight: 30,
    }),
    Rule::Specificity(SpecificityRule {
        min_sentences: 3,
        min_ratio: 0.2,
        weight: 40,
        indicator: "Lack of specific details or concrete information",
    }),
    Rule::Phrases(PhraseRule {
        label: "Multiple generic conclusions",
        phrases: &["in conclusion", "to summarize", "in summary", "overall"],
        threshold: 2,
        weight: 30,
    }),
];

pub static SAFETY_HEDGING_RULES: &[Rule] = &[
    Rule::Phrases(PhraseRule {
        label: "Excessive disclaimers",
        phrases: &[
            "I'?m not (?:a|an)",
            "please consult",
            "you should consult",
            "seek professional",
            "I cannot provide",
            "I'?m unable to",
            "disclaimer",
        ],
        threshold: 2,
        weight: 35,
    }),
    Rule::Phrases(PhraseRule {
        label: "Excessive hedging language",
        phrases: &[
            "might",
            "could",
            "may",
            "perhaps",
            "possibly",
            "potentially",
            "it seems",
            "it appears",
        ],
        threshold: 5,
        weight: 30,
    }),
    Rule::Phrases(PhraseRule {
        label: "Multiple caveats undermining response",
        phrases: &[
            "however",
            "but",
            "although",
            "that said",
            "keep in mind",
            "note that",
        ],
        threshold: 4,
        weight: 35,
    }),
];

/// Rule table for a pattern, in evaluation order.
pub fn rules_for(pattern: DeceptionPattern) -> &'static [Rule] {
    match pattern {
        DeceptionPattern::FacadeOfCompetence => FACADE_OF_COMPETENCE_RULES,
        DeceptionPattern::StochasticParroting => STOCHASTIC_PARROTING_RULES,
        DeceptionPattern::SafetyHedging => SAFETY_HEDGING_RULES,
    }
}

static SENTENCE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence break regex"));
// Word boundaries and digits are ASCII-only throughout.
static SPECIFIC_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)[0-9]+(?-u:\b)|specific|particular|exactly|precisely|namely")
        .expect("valid specific term regex")
});

static FACADE_OF_COMPETENCE: LazyLock<CompiledDetector> = LazyLock::new(|| {
    CompiledDetector::compile(DeceptionPattern::FacadeOfCompetence)
});
static STOCHASTIC_PARROTING: LazyLock<CompiledDetector> = LazyLock::new(|| {
    CompiledDetector::compile(DeceptionPattern::StochasticParroting)
});
static SAFETY_HEDGING: LazyLock<CompiledDetector> =
    LazyLock::new(|| CompiledDetector::compile(DeceptionPattern::SafetyHedging));

struct CompiledDetector {
    pattern: DeceptionPattern,
    rules: Vec<CompiledRule>,
}

enum CompiledRule {
    Phrases {
        rule: &'static PhraseRule,
        regexes: Vec<Regex>,
    },
    Specificity(&'static SpecificityRule),
}

impl CompiledDetector {
    fn compile(pattern: DeceptionPattern) -> Self {
        let rules = rules_for(pattern)
            .iter()
            .map(|rule| match rule {
                Rule::Phrases(rule) => CompiledRule::Phrases {
                    rule,
                    regexes: rule
                        .phrases
                        .iter()
                        .map(|phrase| {
                            Regex::new(&format!(r"(?i)(?-u:\b)(?:{phrase})(?-u:\b)"))
                                .expect("valid lexicon regex")
                        })
                        .collect(),
                },
                Rule::Specificity(rule) => CompiledRule::Specificity(rule),
            })
            .collect();
        Self { pattern, rules }
    }

    fn detect(&self, text: &str) -> DetectionResult {
        if text.is_empty() {
            return DetectionResult::empty(self.pattern);
        }

        let mut score = 0u32;
        let mut indicators = Vec::new();
        for rule in &self.rules {
            if let Some((weight, indicator)) = rule.evaluate(text) {
                score += weight;
                indicators.push(indicator);
            }
        }
        DetectionResult::from_parts(self.pattern, score, indicators)
    }
}

impl CompiledRule {
    /// Weight and indicator text when the rule triggers.
    fn evaluate(&self, text: &str) -> Option<(u32, String)> {
        match self {
            CompiledRule::Phrases { rule, regexes } => {
                let count: usize = regexes.iter().map(|re| re.find_iter(text).count()).sum();
                (count >= rule.threshold)
                    .then(|| (rule.weight, format!("{} ({count} instances)", rule.label)))
            }
            CompiledRule::Specificity(rule) => {
                let sentences = split_sentences(text);
                let specific = sentences
                    .iter()
                    .filter(|s| SPECIFIC_TERM_RE.is_match(s))
                    .count();
                let ratio = specific as f64 / sentences.len().max(1) as f64;
                (ratio < rule.min_ratio && sentences.len() >= rule.min_sentences)
                    .then(|| (rule.weight, rule.indicator.to_string()))
            }
        }
    }
}

/// Splits on runs of `.`, `!` and `?`, dropping blank fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

pub fn detect_facade_of_competence(text: &str) -> DetectionResult {
    FACADE_OF_COMPETENCE.detect(text)
}

pub fn detect_stochastic_parroting(text: &str) -> DetectionResult {
    STOCHASTIC_PARROTING.detect(text)
}

pub fn detect_safety_hedging(text: &str) -> DetectionResult {
    SAFETY_HEDGING.detect(text)
}

/// Runs all three detectors and aggregates them into one verdict.
///
/// `context` is the original user input. It is accepted so callers can pass
/// it along, but no rule consults it yet.
pub fn analyze_deception_patterns(text: &str, context: Option<&str>) -> AnalysisResult {
    let _ = context;

    let all_patterns = AllPatterns {
        facade_of_competence: detect_facade_of_competence(text),
        stochastic_parroting: detect_stochastic_parroting(text),
        safety_hedging: detect_safety_hedging(text),
    };

    let primary = all_patterns.primary();
    let primary_pattern = primary.pattern;
    let recommendation = primary.detected.then_some(primary_pattern);
    let overall_score = all_patterns.iter().map(|r| r.score).max().unwrap_or(0);
    let detected = all_patterns.iter().any(|r| r.detected);

    tracing::debug!(
        facade_of_competence = all_patterns.facade_of_competence.score,
        stochastic_parroting = all_patterns.stochastic_parroting.score,
        safety_hedging = all_patterns.safety_hedging.score,
        primary = %primary_pattern,
        detected,
        "scored response text"
    );

    AnalysisResult {
        primary_pattern,
        all_patterns,
        overall_score,
        detected,
        recommendation,
    }
}

/// Untyped entry point: a missing or non-string value scores as empty text.
pub fn analyze_value(text: &serde_json::Value, context: Option<&str>) -> AnalysisResult {
    match text.as_str() {
        Some(text) => analyze_deception_patterns(text, context),
        None => {
            tracing::debug!(kind = json_kind(text), "non-text input scored as empty");
            analyze_deception_patterns("", context)
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const POLITE_AND_SURE: &str = "I understand your concern. I appreciate your patience. \
        Thank you for reaching out. Certainly this is a valid issue, absolutely.";
    const HEDGED: &str = "This might possibly help, but however it could perhaps not work, \
        although that said, note that results may vary. I cannot provide medical advice, \
        please consult a professional. You should consult a doctor.";
    const MEASURED: &str = "The board measures 120 mm across. It draws 45 W at full load. \
        The fan spins at 2000 rpm.";

    fn assert_zero(result: &DetectionResult, pattern: DeceptionPattern) {
        assert_eq!(result, &DetectionResult::empty(pattern));
        assert_eq!(result.score, 0);
        assert!(!result.detected);
        assert!(result.indicators.is_empty());
        assert_eq!(result.confidence, Confidence::None);
        assert_eq!(result.pattern, pattern);
    }

    #[test]
    fn empty_text_short_circuits_every_detector() {
        assert_zero(
            &detect_facade_of_competence(""),
            DeceptionPattern::FacadeOfCompetence,
        );
        assert_zero(
            &detect_stochastic_parroting(""),
            DeceptionPattern::StochasticParroting,
        );
        assert_zero(&detect_safety_hedging(""), DeceptionPattern::SafetyHedging);
    }

    #[test]
    fn whitespace_only_text_scores_zero() {
        assert_zero(
            &detect_stochastic_parroting("   \n\t "),
            DeceptionPattern::StochasticParroting,
        );
    }

    #[test]
    fn missing_or_non_string_input_degrades_to_zero_result() {
        for value in [json!(null), json!(42), json!(["I understand"]), json!({"text": "x"})] {
            let analysis = analyze_value(&value, None);
            for pattern in DeceptionPattern::ALL {
                assert_zero(analysis.all_patterns.get(pattern), pattern);
            }
            assert_eq!(analysis.overall_score, 0);
            assert!(!analysis.detected);
            assert_eq!(analysis.recommendation, None);
            assert_eq!(analysis.primary_pattern, DeceptionPattern::FacadeOfCompetence);
        }
    }

    #[test]
    fn string_value_is_scored_like_plain_text() {
        let analysis = analyze_value(&json!(HEDGED), None);
        assert_eq!(analysis, analyze_deception_patterns(HEDGED, None));
    }

    #[test]
    fn confidence_bucket_boundaries() {
        let cases = [
            (0, Confidence::None),
            (24, Confidence::None),
            (25, Confidence::Low),
            (49, Confidence::Low),
            (50, Confidence::Medium),
            (74, Confidence::Medium),
            (75, Confidence::High),
            (100, Confidence::High),
        ];
        for (score, expected) in cases {
            assert_eq!(Confidence::from_score(score), expected, "score {score}");
        }
    }

    #[test]
    fn exactly_threshold_score_is_detected_low() {
        let result =
            detect_facade_of_competence("I understand, I appreciate it, and thank you for the 2 reports");
        assert_eq!(result.score, 25);
        assert!(result.detected);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.indicators, vec!["Excessive politeness (3 instances)"]);
    }

    #[test]
    fn below_threshold_score_is_not_detected() {
        let result = detect_facade_of_competence("Certainly, definitely.");
        assert_eq!(result.score, 20);
        assert!(!result.detected);
        assert_eq!(result.confidence, Confidence::None);
        assert_eq!(result.indicators, vec!["Excessive assurance phrases (2 instances)"]);
    }

    #[test]
    fn thresholds_require_the_full_count() {
        let result = detect_facade_of_competence("I understand and I appreciate 3 things");
        assert_eq!(result.score, 0);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn score_is_capped_when_every_rule_fires_heavily() {
        let phrases = [
            "I understand", "I appreciate", "thank you for", "I apologize", "happy to help",
            "glad to assist", "certainly", "definitely", "absolutely", "of course",
            "without a doubt", "leverage", "leveraging", "synergy", "synergies", "paradigm",
            "holistic", "optimize", "optimization", "streamline", "streamlining",
            "best practices", "will look into", "will investigate", "will consider",
            "will explore", "in the future", "down the road", "as mentioned", "as stated",
            "as you said", "as you mentioned", "like you said", "in conclusion",
            "to summarize", "in summary", "overall", "I'm not a", "please consult",
            "you should consult", "seek professional", "I cannot provide", "I'm unable to",
            "disclaimer", "might", "could", "may", "perhaps", "possibly", "potentially",
            "it seems", "it appears", "however", "but", "although", "that said",
            "keep in mind", "note that",
        ];
        let sentence = format!("{}.", phrases.join(", "));
        let text = sentence.repeat(50);

        let analysis = analyze_deception_patterns(&text, None);
        for result in analysis.all_patterns.iter() {
            assert_eq!(result.score, MAX_SCORE, "{}", result.pattern);
            assert_eq!(result.confidence, Confidence::High);
            assert!(result.detected);
        }
        assert_eq!(analysis.overall_score, 100);
        assert_eq!(
            analysis.all_patterns.facade_of_competence.indicators.len(),
            FACADE_OF_COMPETENCE_RULES.len()
        );
    }

    #[test]
    fn detected_tracks_threshold_for_every_detector() {
        let samples = [
            "",
            "Certainly, definitely.",
            POLITE_AND_SURE,
            HEDGED,
            MEASURED,
            "As mentioned, as stated. Fine. Fine. Fine.",
            "However, but, although, that said.",
        ];
        for text in samples {
            let analysis = analyze_deception_patterns(text, None);
            for result in analysis.all_patterns.iter() {
                assert!(result.score <= MAX_SCORE);
                assert_eq!(result.detected, result.score >= DETECTION_THRESHOLD, "{text:?}");
                assert_eq!(result.confidence, Confidence::from_score(result.score));
            }
            let max = analysis.all_patterns.iter().map(|r| r.score).max().unwrap();
            assert_eq!(analysis.overall_score, max);
            assert_eq!(
                analysis.overall_score,
                analysis.all_patterns.get(analysis.primary_pattern).score
            );
            if analysis.detected {
                assert_eq!(analysis.recommendation, Some(analysis.primary_pattern));
            } else {
                assert_eq!(analysis.recommendation, None);
            }
        }
    }

    #[test]
    fn polite_and_assured_text_is_a_facade() {
        let analysis = analyze_deception_patterns(POLITE_AND_SURE, None);
        let facade = &analysis.all_patterns.facade_of_competence;
        assert_eq!(facade.score, 45);
        assert_eq!(facade.confidence, Confidence::Low);
        assert!(facade.detected);
        assert_eq!(
            facade.indicators,
            vec![
                "Excessive politeness (3 instances)",
                "Excessive assurance phrases (2 instances)",
            ]
        );
        // Four sentences without a single concrete detail.
        assert_eq!(analysis.all_patterns.stochastic_parroting.score, 40);
        assert_eq!(analysis.all_patterns.safety_hedging.score, 0);

        assert_eq!(analysis.overall_score, 45);
        assert_eq!(analysis.primary_pattern, DeceptionPattern::FacadeOfCompetence);
        assert_eq!(
            analysis.recommendation,
            Some(DeceptionPattern::FacadeOfCompetence)
        );
    }

    #[test]
    fn disclaimer_heavy_text_is_safety_hedging() {
        let hedging = detect_safety_hedging(HEDGED);
        assert_eq!(hedging.score, 100);
        assert_eq!(hedging.confidence, Confidence::High);
        assert!(hedging.detected);
        assert_eq!(
            hedging.indicators,
            vec![
                "Excessive disclaimers (3 instances)",
                "Excessive hedging language (5 instances)",
                "Multiple caveats undermining response (5 instances)",
            ]
        );

        let analysis = analyze_deception_patterns(HEDGED, Some("Is this safe to take?"));
        assert_eq!(analysis.primary_pattern, DeceptionPattern::SafetyHedging);
        assert_eq!(analysis.overall_score, 100);
        assert_eq!(analysis.recommendation, Some(DeceptionPattern::SafetyHedging));
    }

    #[test]
    fn concrete_factual_text_is_clean() {
        let analysis = analyze_deception_patterns(MEASURED, None);
        for result in analysis.all_patterns.iter() {
            assert_eq!(result.score, 0, "{}", result.pattern);
        }
        assert!(!analysis.detected);
        assert_eq!(analysis.recommendation, None);
        assert_eq!(analysis.primary_pattern, DeceptionPattern::FacadeOfCompetence);
    }

    #[test]
    fn equal_scores_resolve_to_first_pattern() {
        let text = "As mentioned, we leverage synergy and a new paradigm. As stated, 3 items remain.";
        let analysis = analyze_deception_patterns(text, None);
        assert_eq!(analysis.all_patterns.facade_of_competence.score, 30);
        assert_eq!(analysis.all_patterns.stochastic_parroting.score, 30);
        assert_eq!(analysis.all_patterns.safety_hedging.score, 0);
        assert_eq!(analysis.primary_pattern, DeceptionPattern::FacadeOfCompetence);
        assert_eq!(
            analysis.recommendation,
            Some(DeceptionPattern::FacadeOfCompetence)
        );
    }

    #[test]
    fn later_pattern_wins_only_with_strictly_higher_score() {
        let text = "In conclusion, overall it works. To summarize, 4 steps. Certainly, definitely.";
        let analysis = analyze_deception_patterns(text, None);
        assert_eq!(analysis.all_patterns.facade_of_competence.score, 20);
        assert_eq!(analysis.all_patterns.stochastic_parroting.score, 30);
        assert_eq!(analysis.primary_pattern, DeceptionPattern::StochasticParroting);
        assert_eq!(
            analysis.all_patterns.stochastic_parroting.indicators,
            vec!["Multiple generic conclusions (3 instances)"]
        );
    }

    #[test]
    fn below_threshold_primary_has_no_recommendation() {
        let analysis = analyze_deception_patterns("Certainly, definitely.", None);
        assert_eq!(analysis.primary_pattern, DeceptionPattern::FacadeOfCompetence);
        assert_eq!(analysis.overall_score, 20);
        assert!(!analysis.detected);
        assert_eq!(analysis.recommendation, None);
    }

    #[test]
    fn lack_of_specifics_needs_more_than_two_sentences() {
        assert_eq!(detect_stochastic_parroting("Things are fine. It works.").score, 0);

        let vague = detect_stochastic_parroting("Things are fine. It works. We are happy.");
        assert_eq!(vague.score, 40);
        assert_eq!(
            vague.indicators,
            vec!["Lack of specific details or concrete information"]
        );

        let specific =
            detect_stochastic_parroting("Things are fine. It works. Specifically the fan.");
        assert_eq!(specific.score, 0);
    }

    #[test]
    fn phrases_match_whole_words_case_insensitively() {
        let result = detect_safety_hedging("HOWEVER, although, That Said, note that the butter melted.");
        assert_eq!(
            result.indicators,
            vec!["Multiple caveats undermining response (4 instances)"]
        );
        assert_eq!(result.score, 35);
    }

    #[test]
    fn contracted_and_bare_disclaimers_both_count() {
        let result = detect_safety_hedging("I'm not a lawyer and Im unable to advise");
        assert_eq!(result.indicators, vec!["Excessive disclaimers (2 instances)"]);
    }

    #[test]
    fn negation_is_not_special_cased() {
        let result = detect_facade_of_competence("I am NOT certainly sure, definitely not");
        assert_eq!(result.score, 20);
    }

    #[test]
    fn sentences_split_on_terminator_runs() {
        assert_eq!(
            split_sentences("One!! Two?  . Three."),
            vec!["One", " Two", " Three"]
        );
        assert!(split_sentences("...?!").is_empty());
    }

    #[test]
    fn analysis_serializes_with_fixed_identifiers() {
        let value = serde_json::to_value(analyze_deception_patterns(HEDGED, None)).unwrap();
        assert_eq!(value["primaryPattern"], "safety-hedging");
        assert_eq!(value["recommendation"], "safety-hedging");
        assert_eq!(value["overallScore"], 100);
        assert_eq!(value["allPatterns"]["safety-hedging"]["confidence"], "high");
        assert_eq!(
            value["allPatterns"]["facade-of-competence"]["pattern"],
            "facade-of-competence"
        );

        let clean = serde_json::to_value(analyze_deception_patterns(MEASURED, None)).unwrap();
        assert_eq!(clean["recommendation"], "none");
        assert_eq!(clean["detected"], false);
    }

    #[test]
    fn flattened_indicators_are_tagged_by_pattern() {
        let analysis = analyze_deception_patterns(POLITE_AND_SURE, None);
        assert_eq!(
            analysis.flattened_indicators(),
            vec![
                "facade-of-competence: Excessive politeness (3 instances)",
                "facade-of-competence: Excessive assurance phrases (2 instances)",
                "stochastic-parroting: Lack of specific details or concrete information",
            ]
        );
    }

    #[test]
    fn pattern_displays_as_identifier() {
        assert_eq!(DeceptionPattern::SafetyHedging.to_string(), "safety-hedging");
    }

    #[test]
    fn non_ascii_letters_are_word_boundaries() {
        let result = detect_facade_of_competence("éparadigm, ésynergy, éholistic");
        assert_eq!(result.score, 30);
        assert_eq!(
            result.indicators,
            vec!["Excessive jargon without substance (3 instances)"]
        );
    }

    #[test]
    fn only_ascii_digits_count_as_specific() {
        let result = detect_stochastic_parroting(&"Fan at \u{663}. ".repeat(3));
        assert_eq!(result.score, 40);
        assert_eq!(detect_stochastic_parroting(&"Fan at 3. ".repeat(3)).score, 0);
    }
}
