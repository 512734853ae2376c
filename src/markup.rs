//! Game-feed markup translation.
//!
//! The feed speaks a small HTML dialect. Each line is rewritten into IRC
//! control bytes by an ordered list of substitutions. Order matters: the
//! broad tag-stripping rule must run before the span/font rules would see
//! their closing tags, and the space-collapsing rule must run after `<li>`
//! inserts its indent.
//!
//! Lines starting with `|` whose payload is `/data-<kind> <key>` (after an
//! optional `|raw|` prefix is dropped) are data requests and never go through
//! the HTML rules. Any other line, `|` or not, is HTML.

use crate::data::{DataLookupDispatcher, is_data_request};
use crate::format::{BOLD, ITALIC, RESET};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Prefix the feed puts in front of pre-rendered HTML lines.
pub const RAW_PREFIX: &str = "|raw|";

/// Sentinel that marks a data request line.
pub const DATA_SENTINEL: char = '|';

struct Rule {
    pattern: Regex,
    replacement: Cow<'static, str>,
}

impl Rule {
    fn new(pattern: &str, replacement: impl Into<Cow<'static, str>>) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("bad rule {pattern}: {e}")),
            replacement: replacement.into(),
        }
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"<br\s*/?>", "\n"),
        Rule::new(r#"<a href="(.+?)">(.*?)</a>"#, "[${2}](${1})"),
        Rule::new(r"<li>", "\n  \u{2022} "),
        Rule::new(r"</?(?:ul|font size).*?>", ""),
        Rule::new(r"</?b>", BOLD.to_string()),
        Rule::new(r"</?em>", ITALIC.to_string()),
        Rule::new(r"<(?:/span|/font|font color=black)>", RESET.to_string()),
        Rule::new(r#"<span class="message-effect-weak">"#, "\x02\x034"),
        Rule::new(r#"<span class="message-effect-resist">"#, "\x02\x0312"),
        Rule::new(r#"<span class="message-effect-immune">"#, "\x02\x0314"),
        Rule::new(r#"<span class="message-learn-canlearn">"#, "\x02\x1F\x033"),
        Rule::new(r#"<span class="message-learn-cannotlearn">"#, "\x02\x1F\x034"),
        Rule::new(r"<font color=#585858>", "\x0314"),
        Rule::new(r"&nbsp;|&ThickSpace;| +", " "),
        Rule::new(r"&#10003;", "\u{2713}"),
    ]
});

/// Apply the HTML-dialect rules to one line.
///
/// Total: text no rule recognises passes through unchanged.
pub fn rewrite_html(line: &str) -> String {
    let mut text = Cow::Borrowed(line);
    for rule in RULES.iter() {
        let replaced = match rule.pattern.replace_all(&text, rule.replacement.as_ref()) {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
        if let Some(s) = replaced {
            text = Cow::Owned(s);
        }
    }
    text.into_owned()
}

/// Drop a leading `|raw|` marker if present.
pub fn strip_raw(line: &str) -> &str {
    line.strip_prefix(RAW_PREFIX).unwrap_or(line)
}

/// Split translated text into the pieces that become separate chat lines.
///
/// Empty pieces are dropped; order is preserved.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|piece| !piece.is_empty())
}

/// Translates feed lines into chat-ready text.
pub struct MarkupTranslator {
    data: DataLookupDispatcher,
}

impl MarkupTranslator {
    pub fn new(data: DataLookupDispatcher) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &DataLookupDispatcher {
        &self.data
    }

    /// Translate one feed line. Never fails.
    ///
    /// The result may contain newlines; use [`split_lines`] before sending.
    pub fn translate(&self, line: &str) -> String {
        let line = strip_raw(line);
        if is_data_request(line) {
            self.data.render_line(line)
        } else {
            rewrite_html(line)
        }
    }

    /// Translate a feed line and split it into outbound chat lines.
    pub fn translate_lines(&self, line: &str) -> Vec<String> {
        let translated = self.translate(line);
        split_lines(&translated).map(str::to_owned).collect()
    }
}
