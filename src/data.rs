use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{LoadError, MalformedData, Resource};

/// One ordered cell of the interaction matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Interaction {
    pub sentiment: f64,
    pub count: u64,
}

impl Interaction {
    pub fn new(sentiment: f64, count: u64) -> Self {
        Self { sentiment, count }
    }
}

/// Square `n x n` table of ordered interactions. Diagonal cells are stored as
/// empty and never read by the aggregator. Row totals are summed once here,
/// so a matrix that exists always has totals that fit in a `u64`.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionMatrix {
    size: usize,
    cells: Vec<Interaction>,
    totals: Vec<u64>,
}

impl InteractionMatrix {
    pub fn from_rows(rows: Vec<Vec<Interaction>>) -> Result<Self, MalformedData> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        let mut totals = Vec::with_capacity(size);

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MalformedData::RowLength {
                    row: row_index,
                    len: row.len(),
                    expected: size,
                });
            }

            let mut total = 0u64;
            for (col_index, cell) in row.into_iter().enumerate() {
                if row_index == col_index {
                    cells.push(Interaction::default());
                    continue;
                }
                if !cell.sentiment.is_finite() {
                    return Err(MalformedData::NonFiniteSentiment {
                        row: row_index,
                        col: col_index,
                    });
                }
                total = total
                    .checked_add(cell.count)
                    .ok_or(MalformedData::TotalOverflow { row: row_index })?;
                cells.push(cell);
            }
            totals.push(total);
        }

        Ok(Self {
            size,
            cells,
            totals,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell `(row, col)`, `None` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<Interaction> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col).copied()
    }

    /// Off-diagonal count sum of each row.
    pub fn totals(&self) -> &[u64] {
        &self.totals
    }
}

/// Character names paired with their interaction matrix, dimensions checked.
#[derive(Clone, Debug)]
pub struct Dataset {
    names: Vec<String>,
    matrix: InteractionMatrix,
}

impl Dataset {
    pub fn new(names: Vec<String>, matrix: InteractionMatrix) -> Result<Self, MalformedData> {
        if names.len() != matrix.size() {
            return Err(MalformedData::RowCount {
                names: names.len(),
                rows: matrix.size(),
            });
        }
        Ok(Self { names, matrix })
    }

    /// Reads both JSON files. Nothing downstream runs unless both parse and
    /// agree on dimensions.
    pub fn load(names_path: &Path, interactions_path: &Path) -> Result<Self, LoadError> {
        let result = read_resource(Resource::Names, names_path).and_then(|names_raw| {
            let interactions_raw = read_resource(Resource::Interactions, interactions_path)?;
            Self::from_json(&names_raw, &interactions_raw)
        });

        match &result {
            Ok(dataset) => info!(
                characters = dataset.len(),
                names = %names_path.display(),
                interactions = %interactions_path.display(),
                "loaded interaction data"
            ),
            Err(error) => warn!(
                kind = ?error.kind(),
                names = %names_path.display(),
                interactions = %interactions_path.display(),
                "failed to load interaction data: {error}"
            ),
        }

        result
    }

    pub fn from_json(names_raw: &str, interactions_raw: &str) -> Result<Self, LoadError> {
        let names_value: Value =
            serde_json::from_str(names_raw).map_err(|source| LoadError::Unparseable {
                resource: Resource::Names,
                source,
            })?;
        let matrix_value: Value =
            serde_json::from_str(interactions_raw).map_err(|source| LoadError::Unparseable {
                resource: Resource::Interactions,
                source,
            })?;

        let names = parse_names(&names_value)?;
        let matrix = parse_matrix(&matrix_value, names.len())?;
        Ok(Self::new(names, matrix)?)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn read_resource(resource: Resource, path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Unreachable {
        resource,
        path: path.to_path_buf(),
        source,
    })
}

fn parse_names(value: &Value) -> Result<Vec<String>, MalformedData> {
    let array = value.as_array().ok_or(MalformedData::NamesNotArray)?;
    array
        .iter()
        .enumerate()
        .map(|(index, name)| {
            name.as_str()
                .map(str::to_owned)
                .ok_or(MalformedData::NameNotString { index })
        })
        .collect()
}

fn parse_matrix(value: &Value, expected: usize) -> Result<InteractionMatrix, MalformedData> {
    let rows = value.as_array().ok_or(MalformedData::MatrixNotArray)?;
    if rows.len() != expected {
        return Err(MalformedData::RowCount {
            names: expected,
            rows: rows.len(),
        });
    }

    let mut parsed = Vec::with_capacity(rows.len());
    let mut empty_cells = 0usize;
    for (row_index, row) in rows.iter().enumerate() {
        let entries = row
            .as_array()
            .ok_or(MalformedData::RowNotArray { row: row_index })?;
        if entries.len() != expected {
            return Err(MalformedData::RowLength {
                row: row_index,
                len: entries.len(),
                expected,
            });
        }

        let mut cells = Vec::with_capacity(expected);
        for (col_index, entry) in entries.iter().enumerate() {
            if row_index == col_index {
                cells.push(Interaction::default());
                continue;
            }
            if entry.is_null() {
                empty_cells += 1;
                cells.push(Interaction::default());
                continue;
            }
            cells.push(parse_entry(entry, row_index, col_index)?);
        }
        parsed.push(cells);
    }

    if empty_cells > 0 {
        debug!(empty_cells, "off-diagonal null entries treated as no interaction");
    }

    InteractionMatrix::from_rows(parsed)
}

fn parse_entry(entry: &Value, row: usize, col: usize) -> Result<Interaction, MalformedData> {
    let [sentiment, count] = entry
        .as_array()
        .map(Vec::as_slice)
        .ok_or(MalformedData::EntryShape { row, col })?
    else {
        return Err(MalformedData::EntryShape { row, col });
    };

    let sentiment = sentiment
        .as_f64()
        .ok_or(MalformedData::EntryShape { row, col })?;
    let count = parse_count(count).ok_or_else(|| MalformedData::InvalidCount {
        row,
        col,
        value: count.to_string(),
    })?;

    Ok(Interaction { sentiment, count })
}

fn parse_count(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }

    // Counts written by numpy can come through as `3.0`.
    let float = value.as_f64()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float < u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadErrorKind;

    const NAMES: &str = r#"["A", "B", "C"]"#;
    const MATRIX: &str = r#"[
        [null, [0.4, 10], [0.0, 1]],
        [[0.3, 10], null, [0.0, 0]],
        [[0.0, 1], [0.0, 0], null]
    ]"#;

    #[test]
    fn parses_names_and_matrix() {
        let dataset = Dataset::from_json(NAMES, MATRIX).unwrap();
        assert_eq!(dataset.names(), ["A", "B", "C"]);
        assert_eq!(dataset.matrix().get(0, 1), Some(Interaction::new(0.4, 10)));
        assert_eq!(dataset.matrix().get(1, 0), Some(Interaction::new(0.3, 10)));
        assert_eq!(dataset.matrix().get(1, 1), Some(Interaction::default()));
        assert_eq!(dataset.matrix().get(3, 0), None);
        assert_eq!(dataset.matrix().totals(), [11, 10, 1]);
    }

    #[test]
    fn extra_matrix_row_is_malformed() {
        let matrix = r#"[
            [null, [0, 1], [0, 1], [0, 1]],
            [[0, 1], null, [0, 1], [0, 1]],
            [[0, 1], [0, 1], null, [0, 1]],
            [[0, 1], [0, 1], [0, 1], null]
        ]"#;
        let error = Dataset::from_json(NAMES, matrix).unwrap_err();
        assert_eq!(error.kind(), LoadErrorKind::MalformedData);
        assert!(matches!(
            error,
            LoadError::Malformed(MalformedData::RowCount { names: 3, rows: 4 })
        ));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let matrix = r#"[[null, [0, 1], [0, 1]], [[0, 1], null], [[0, 1], [0, 1], null]]"#;
        let error = Dataset::from_json(NAMES, matrix).unwrap_err();
        assert!(matches!(
            error,
            LoadError::Malformed(MalformedData::RowLength { row: 1, len: 2, expected: 3 })
        ));
    }

    #[test]
    fn entry_without_pair_shape_is_malformed() {
        let matrix = r#"[[null, [0.1], [0, 1]], [[0, 1], null, [0, 1]], [[0, 1], [0, 1], null]]"#;
        let error = Dataset::from_json(NAMES, matrix).unwrap_err();
        assert!(matches!(
            error,
            LoadError::Malformed(MalformedData::EntryShape { row: 0, col: 1 })
        ));
    }

    #[test]
    fn negative_or_fractional_counts_are_rejected() {
        for bad in ["-1", "2.5", "\"3\""] {
            let matrix = format!(
                "[[null, [0, {bad}], [0, 1]], [[0, 1], null, [0, 1]], [[0, 1], [0, 1], null]]"
            );
            let error = Dataset::from_json(NAMES, &matrix).unwrap_err();
            assert!(
                matches!(
                    error,
                    LoadError::Malformed(MalformedData::InvalidCount { row: 0, col: 1, .. })
                ),
                "count {bad} should be rejected, got {error:?}"
            );
        }
    }

    #[test]
    fn integral_float_counts_are_accepted() {
        let matrix = r#"[[null, [0, 3.0], [0, 1]], [[0, 3], null, [0, 1]], [[0, 1], [0, 1], null]]"#;
        let dataset = Dataset::from_json(NAMES, matrix).unwrap();
        assert_eq!(dataset.matrix().get(0, 1).map(|cell| cell.count), Some(3));
    }

    #[test]
    fn diagonal_contents_are_ignored() {
        let matrix = r#"[["junk", [0, 1], [0, 1]], [[0, 1], 7, [0, 1]], [[0, 1], [0, 1], [9, 9]]]"#;
        let dataset = Dataset::from_json(NAMES, matrix).unwrap();
        assert_eq!(dataset.matrix().get(2, 2), Some(Interaction::default()));
    }

    #[test]
    fn invalid_json_is_a_fetch_failure() {
        let error = Dataset::from_json("[\"A\"", MATRIX).unwrap_err();
        assert_eq!(error.kind(), LoadErrorKind::ResourceFetchFailure);
    }

    #[test]
    fn missing_file_is_a_fetch_failure() {
        let error = Dataset::load(
            Path::new("/definitely/not/here/names.json"),
            Path::new("/definitely/not/here/interactions.json"),
        )
        .unwrap_err();
        assert_eq!(error.kind(), LoadErrorKind::ResourceFetchFailure);
        assert!(matches!(
            error,
            LoadError::Unreachable {
                resource: Resource::Names,
                ..
            }
        ));
    }

    #[test]
    fn row_total_overflow_is_malformed() {
        let matrix = r#"[
            [null, [0, 18446744073709551615], [0, 2]],
            [[0, 1], null, [0, 1]],
            [[0, 2], [0, 1], null]
        ]"#;
        let error = Dataset::from_json(NAMES, matrix).unwrap_err();
        assert_eq!(error.kind(), LoadErrorKind::MalformedData);
        assert!(matches!(
            error,
            LoadError::Malformed(MalformedData::TotalOverflow { row: 0 })
        ));
    }

    #[test]
    fn largest_single_count_still_loads() {
        let matrix = r#"[
            [null, [0, 18446744073709551615], [0, 0]],
            [[0, 1], null, [0, 1]],
            [[0, 0], [0, 1], null]
        ]"#;
        let dataset = Dataset::from_json(NAMES, matrix).unwrap();
        assert_eq!(dataset.matrix().totals()[0], u64::MAX);
    }

    #[test]
    fn float_count_at_two_to_the_64_is_rejected() {
        let matrix = r#"[
            [null, [0, 18446744073709551616.0], [0, 1]],
            [[0, 1], null, [0, 1]],
            [[0, 1], [0, 1], null]
        ]"#;
        let error = Dataset::from_json(NAMES, matrix).unwrap_err();
        assert!(matches!(
            error,
            LoadError::Malformed(MalformedData::InvalidCount { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn row_that_is_not_an_array_is_malformed() {
        let matrix = r#"[[null, [0, 1], [0, 1]], {"row": 1}, [[0, 1], [0, 1], null]]"#;
        let error = Dataset::from_json(NAMES, matrix).unwrap_err();
        assert!(matches!(
            error,
            LoadError::Malformed(MalformedData::RowNotArray { row: 1 })
        ));
        assert_eq!(
            error.to_string(),
            "malformed input data: row 1 is not a JSON array"
        );
    }

    #[test]
    fn from_rows_rejects_non_square_input() {
        let rows = vec![vec![Interaction::default(); 2], vec![Interaction::default(); 3]];
        assert_eq!(
            InteractionMatrix::from_rows(rows),
            Err(MalformedData::RowLength {
                row: 1,
                len: 3,
                expected: 2,
            })
        );
    }
}
