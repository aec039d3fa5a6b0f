//! Reading time estimation

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ReadTimeConfig;
use crate::helpers::strip_html;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?m)^#+").unwrap();
}

/// Summaries longer than this are assumed to belong to long articles
const LONG_SUMMARY_CHARS: usize = 200;

/// Estimate reading time of `content` in minutes.
///
/// One minute per `words_per_minute` words, plus one minute per
/// `headings_weight` headings, rounded up. Long and very long articles are
/// floored at their configured minimum and the result is never below
/// `default_time`.
pub fn estimate_read_time(content: &str, config: &ReadTimeConfig) -> u32 {
    if config.words_per_minute == 0 || config.headings_weight == 0 {
        tracing::warn!("Read time configuration has a zero divisor, using default time");
        return config.default_time;
    }

    let text = strip_html(content);
    let words = text.split_whitespace().count();
    let headings = HEADING.find_iter(&text).count();

    let minutes = words.div_ceil(config.words_per_minute as usize)
        + headings.div_ceil(config.headings_weight as usize);
    let mut minutes = u32::try_from(minutes).unwrap_or(u32::MAX);

    if words > config.very_long_article_threshold {
        minutes = minutes.max(config.min_time_for_very_long_article);
    } else if words > config.long_article_threshold {
        minutes = minutes.max(config.min_time_for_long_article);
    }

    minutes.max(config.default_time)
}

/// Estimate reading time from a summary when the body isn't available.
///
/// The summary estimate is tripled, then floored at the long-article
/// minimum for long summaries or at the default time otherwise.
pub fn estimate_from_summary(summary: &str, config: &ReadTimeConfig) -> u32 {
    let estimate = estimate_read_time(summary, config).saturating_mul(3);
    let floor = if summary.chars().count() > LONG_SUMMARY_CHARS {
        config.min_time_for_long_article
    } else {
        config.default_time
    };
    estimate.max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_short_article_uses_default_floor() {
        let config = ReadTimeConfig::default();
        assert_eq!(estimate_read_time("just a few words", &config), 3);
        assert_eq!(estimate_read_time("", &config), 3);
    }

    #[test]
    fn test_words_and_headings() {
        let config = ReadTimeConfig::default();
        // 1000 words -> 5 min, 6 headings -> +2
        let mut text = String::new();
        for _ in 0..6 {
            text.push_str("## Section\n");
        }
        text.push_str(&words(988));
        assert_eq!(text.split_whitespace().count(), 1000);
        assert_eq!(estimate_read_time(&text, &config), 7);
    }

    #[test]
    fn test_below_long_threshold_formula() {
        let config = ReadTimeConfig {
            default_time: 1,
            ..Default::default()
        };
        assert_eq!(estimate_read_time(&words(401), &config), 3);
        assert_eq!(estimate_read_time(&words(10), &config), 1);
    }

    #[test]
    fn test_long_and_very_long_floors() {
        let config = ReadTimeConfig {
            words_per_minute: 1000,
            ..Default::default()
        };
        // 1600 words -> 2 min, floored at the long minimum
        assert_eq!(estimate_read_time(&words(1600), &config), 5);
        // 3100 words -> 4 min, floored at the very long minimum
        assert_eq!(estimate_read_time(&words(3100), &config), 10);
    }

    #[test]
    fn test_html_is_stripped() {
        let config = ReadTimeConfig {
            default_time: 0,
            words_per_minute: 2,
            ..Default::default()
        };
        assert_eq!(estimate_read_time("<p class=\"x y z\">one two</p>", &config), 1);
    }

    #[test]
    fn test_bare_angle_brackets_count_as_prose() {
        let config = ReadTimeConfig {
            default_time: 0,
            words_per_minute: 2,
            ..Default::default()
        };
        // six words, none of them inside a tag
        assert_eq!(estimate_read_time("x <y and then later> z", &config), 3);
    }

    #[test]
    fn test_zero_divisor_returns_default() {
        let config = ReadTimeConfig {
            words_per_minute: 0,
            ..Default::default()
        };
        assert_eq!(estimate_read_time(&words(5000), &config), 3);
    }

    #[test]
    fn test_summary_estimate() {
        let config = ReadTimeConfig {
            default_time: 1,
            ..Default::default()
        };
        assert_eq!(estimate_from_summary("short summary", &config), 3);
        let long = "word ".repeat(60);
        assert_eq!(estimate_from_summary(&long, &config), 5);
    }
}
