use nom::{
    bytes::complete::{take_till1, take_while1},
    character::complete::{alpha1, anychar, char, digit0, digit1, one_of, space0, space1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use polcla_lexicon::{Lexicons, SentimentRow, ShifterRow};
use polcla_protocol::{AnnotatorFlags, LexiconPos, PolarityCategory, ScopeRule, ShifterKind};
use tracing::{info, warn};

fn word(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// Accepts both `0.7` and the German `0,7`.
fn decimal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(digit1, opt(pair(one_of(".,"), digit0)))),
        |s: &str| s.replace(',', ".").parse::<f64>(),
    )(input)
}

fn sentiment_fields(input: &str) -> IResult<&str, (&str, &str, f64, &str)> {
    all_consuming(terminated(
        tuple((
            word,
            preceded(space1, alpha1),
            preceded(char('='), decimal),
            preceded(space1, alpha1),
        )),
        space0,
    ))(input)
}

fn scope_list(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        char('['),
        separated_list0(char(','), take_while1(|c: char| c != ',' && c != ']')),
        char(']'),
    )(input)
}

fn shifter_fields(input: &str) -> IResult<&str, (&str, char, Vec<&str>, &str)> {
    all_consuming(terminated(
        tuple((
            word,
            preceded(space1, anychar),
            preceded(space1, scope_list),
            preceded(space1, alpha1),
        )),
        space0,
    ))(input)
}

/// Content lines with their 1-based line numbers. `%%` starts a comment.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end()))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with("%%"))
}

/// Reads every well-formed sentiment row. Malformed rows are logged and skipped.
pub fn read_sentiment_rows(text: &str) -> Vec<SentimentRow> {
    let mut rows = Vec::new();

    for (line, content) in content_lines(text) {
        let Ok((_, (key, category, value, pos))) = sentiment_fields(content) else {
            warn!(line, content, "skipping malformed sentiment row");
            continue;
        };

        let category = match category.parse::<PolarityCategory>() {
            Ok(category) => category,
            Err(reason) => {
                warn!(line, key, %reason, "skipping sentiment row");
                continue;
            }
        };

        rows.push(SentimentRow {
            line,
            key: key.to_string(),
            category,
            value,
            pos: LexiconPos::parse(pos),
        });
    }

    rows
}

/// Reads every well-formed shifter (or intensifier) row.
///
/// Scope entries that are not recognized are dropped with a warning, so the
/// resolver treats them as rules that never find a candidate.
pub fn read_shifter_rows(text: &str) -> Vec<ShifterRow> {
    let mut rows = Vec::new();

    for (line, content) in content_lines(text) {
        let Ok((_, (key, code, scopes, pos))) = shifter_fields(content) else {
            warn!(line, content, "skipping malformed shifter row");
            continue;
        };

        let Some(kind) = ShifterKind::from_code(code) else {
            warn!(line, key, %code, "unknown shifter type");
            continue;
        };

        let mut scope = Vec::with_capacity(scopes.len());
        for raw in scopes {
            match raw.parse::<ScopeRule>() {
                Ok(rule) => scope.push(rule),
                Err(err) => warn!(line, key, "{err}"),
            }
        }

        rows.push(ShifterRow {
            line,
            key: key.to_string(),
            kind,
            scope,
            pos: LexiconPos::parse(pos),
        });
    }

    rows
}

/// Reads the flat lexicon files and builds the lookup tables from them.
pub fn parse_lexicons(sentiment: &str, shifter: &str, intensifier: Option<&str>, flags: AnnotatorFlags) -> Lexicons {
    let sentiment = read_sentiment_rows(sentiment);
    let shifter = read_shifter_rows(shifter);
    let intensifier = intensifier.map(read_shifter_rows);
    info!(
        sentiment_rows = sentiment.len(),
        shifter_rows = shifter.len(),
        "lexicon files read"
    );
    Lexicons::from_rows(sentiment, shifter, intensifier, flags)
}
