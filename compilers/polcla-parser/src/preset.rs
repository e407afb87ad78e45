use nom::{
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map_res},
    multi::separated_list0,
    sequence::delimited,
    IResult,
};

use crate::error::{ReadError, Result};

fn positions(input: &str) -> IResult<&str, Vec<u32>> {
    all_consuming(delimited(
        space0,
        separated_list0(space1, map_res(digit1, str::parse::<u32>)),
        space0,
    ))(input)
}

/// Reads preset subjective-expression positions, one line per sentence.
///
/// Each line lists the 1-based token positions of that sentence's
/// expressions; an empty line stands for a sentence without any.
pub fn read_preset_expressions(text: &str) -> Result<Vec<Vec<u32>>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            let content = line.trim_end_matches('\r');
            match positions(content) {
                Ok((_, list)) if !list.contains(&0) => Ok(list),
                _ => Err(ReadError::Malformed {
                    line: i + 1,
                    content: content.to_string(),
                }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_per_sentence() {
        let presets = read_preset_expressions("5\n\n 2 7  9\n").unwrap();
        assert_eq!(presets, vec![vec![5], vec![], vec![2, 7, 9]]);
    }

    #[test]
    fn test_rejects_words_and_root() {
        let word = read_preset_expressions("3\nfünf\n").unwrap_err();
        assert!(matches!(word, ReadError::Malformed { line: 2, .. }));

        let root = read_preset_expressions("0 4\n").unwrap_err();
        assert!(matches!(root, ReadError::Malformed { line: 1, .. }));
    }
}
