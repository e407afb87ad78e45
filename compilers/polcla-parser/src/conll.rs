use nom::{
    bytes::complete::take_till,
    character::complete::char,
    multi::separated_list1,
    IResult,
};

use tracing::warn;

use crate::error::{ReadError, Result};

/// One token line of a ParZu CoNLL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConllRow {
    pub id: u32,
    pub form: String,
    pub lemma: String,
    pub pos: String,
    /// 0 is the virtual root.
    pub head: u32,
    pub relation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConllSentence {
    pub rows: Vec<ConllRow>,
    /// First malformed row of the sentence. Its rows are kept up to there.
    pub error: Option<ReadError>,
}

impl ConllSentence {
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|r| r.form.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.error.is_none()
    }
}

fn columns(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char('\t'), take_till(|c: char| c == '\t'))(input)
}

fn number(line: usize, field: &'static str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| ReadError::NotANumber {
        line,
        field,
        value: value.to_string(),
    })
}

fn parse_row(line: usize, content: &str) -> Result<ConllRow> {
    let malformed = || ReadError::Malformed {
        line,
        content: content.to_string(),
    };

    let (_, cols) = columns(content).map_err(|_| malformed())?;
    if cols.len() < 8 {
        return Err(malformed());
    }

    let form = cols[1].to_string();
    // ParZu writes `_` when it has no lemma.
    let lemma = match cols[2] {
        "_" | "" => form.clone(),
        lemma => lemma.to_string(),
    };

    Ok(ConllRow {
        id: number(line, "id", cols[0])?,
        form,
        lemma,
        pos: cols[4].to_string(),
        head: number(line, "head", cols[6])?,
        relation: cols[7].to_string(),
    })
}

/// Splits a ParZu CoNLL document into sentences. Blank lines separate sentences.
///
/// A malformed row marks its sentence as broken and the rest of that
/// sentence is skipped; the following sentences are read as usual.
pub fn read_conll(text: &str) -> Vec<ConllSentence> {
    let mut sentences = Vec::new();
    let mut current = ConllSentence::default();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let content = line.trim_end_matches(['\r', '\n']);

        if content.trim().is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }

        if current.error.is_some() {
            continue;
        }
        match parse_row(line_no, content) {
            Ok(row) => current.rows.push(row),
            Err(err) => {
                warn!(sentence = sentences.len() + 1, "{err}");
                current.error = Some(err);
            }
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}
