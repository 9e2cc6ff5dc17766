//! Case-insensitive full outer join of two tables
//!
//! The algorithm:
//! 1. Resolve the key column on each side (schema error if absent)
//! 2. Sort row indices of each side by the lower-cased key (stable)
//! 3. Reject duplicate keys within either side
//! 4. Walk both sorted sides once: equal keys emit a merged row, the
//!    smaller key is deferred to its side's unmatched list
//! 5. Append unmatched left rows (empty right side), then unmatched right
//!    rows (empty left side), each in sorted order

use crate::error::{RecordsError, Result};
use crate::table::Table;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The pair of key columns, one per input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKey {
    pub left: String,
    pub right: String,
}

impl JoinKey {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl FromStr for JoinKey {
    type Err = String;

    /// Parse `left:right`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((left, right)) if !left.is_empty() && !right.is_empty() => {
                Ok(JoinKey::new(left, right))
            }
            _ => Err(format!(
                "Invalid join key '{}': expected <field1>:<field2>",
                s
            )),
        }
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.left, self.right)
    }
}

/// Full outer join of `left` and `right` on case-insensitive key equality.
///
/// The output header is `left.headers ++ right.headers`; every output row is
/// exactly that wide. Inputs are not modified.
pub fn outer_join(left: &Table, right: &Table, key: &JoinKey) -> Result<Table> {
    let left_sorted = sorted_keys(left, &key.left)?;
    let right_sorted = sorted_keys(right, &key.right)?;

    let mut headers = left.headers().to_vec();
    headers.extend(right.headers().iter().cloned());
    let mut joined = Table::new(
        format!("{} + {}", left.source(), right.source()),
        headers,
    );

    let empty_left = vec![String::new(); left.width()];
    let empty_right = vec![String::new(); right.width()];

    let mut unmatched_left = Vec::new();
    let mut unmatched_right = Vec::new();
    let (mut l, mut r) = (0, 0);

    while l < left_sorted.len() || r < right_sorted.len() {
        let ordering = match (left_sorted.get(l), right_sorted.get(r)) {
            (Some((lk, _)), Some((rk, _))) => lk.cmp(rk),
            (Some(_), None) => Ordering::Less,
            (None, _) => Ordering::Greater,
        };

        match ordering {
            Ordering::Equal => {
                let (li, ri) = (left_sorted[l].1, right_sorted[r].1);
                joined.push_row(concat(&left.rows()[li], &right.rows()[ri]))?;
                l += 1;
                r += 1;
            }
            Ordering::Less => {
                unmatched_left.push(left_sorted[l].1);
                l += 1;
            }
            Ordering::Greater => {
                unmatched_right.push(right_sorted[r].1);
                r += 1;
            }
        }
    }

    let matched = joined.len();
    for li in &unmatched_left {
        joined.push_row(concat(&left.rows()[*li], &empty_right))?;
    }
    for ri in &unmatched_right {
        joined.push_row(concat(&empty_left, &right.rows()[*ri]))?;
    }

    tracing::info!(
        matched,
        unmatched_left = unmatched_left.len(),
        unmatched_right = unmatched_right.len(),
        "Joined tables on {}",
        key
    );
    Ok(joined)
}

/// Lower-cased key and row index for every row, sorted by key
fn sorted_keys(table: &Table, column: &str) -> Result<Vec<(String, usize)>> {
    let index = table.column_index(column)?;
    let mut keys: Vec<(String, usize)> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| (row[index].to_lowercase(), i))
        .collect();
    keys.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(pair) = keys.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(RecordsError::DuplicateKey {
            table: table.source().to_string(),
            key: table.rows()[pair[1].1][index].clone(),
        });
    }
    Ok(keys)
}

fn concat(a: &[String], b: &[String]) -> Vec<String> {
    let mut row = Vec::with_capacity(a.len() + b.len());
    row.extend_from_slice(a);
    row.extend_from_slice(b);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(source: &str, csv: &str) -> Table {
        Table::from_reader(csv.as_bytes(), source).unwrap()
    }

    fn rows(t: &Table) -> Vec<Vec<&str>> {
        t.rows()
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_join_key_parses_field_pair() {
        let key: JoinKey = "student:Student ID".parse().unwrap();
        assert_eq!(key, JoinKey::new("student", "Student ID"));
    }

    #[test]
    fn test_join_key_rejects_missing_separator() {
        assert!("student".parse::<JoinKey>().is_err());
        assert!(":id".parse::<JoinKey>().is_err());
        assert!("id:".parse::<JoinKey>().is_err());
    }

    #[test]
    fn test_case_insensitive_match() {
        let a = table("a", "id,name\nS0000007,Ada\n");
        let b = table("b", "sid,mark\ns0000007,91\n");

        let joined = outer_join(&a, &b, &JoinKey::new("id", "sid")).unwrap();

        assert_eq!(joined.headers(), &["id", "name", "sid", "mark"]);
        assert_eq!(rows(&joined), vec![vec!["S0000007", "Ada", "s0000007", "91"]]);
    }

    #[test]
    fn test_matched_rows_come_in_key_order() {
        let a = table("a", "id,v\nc,3\na,1\nb,2\n");
        let b = table("b", "id,w\nB,y\nC,z\nA,x\n");

        let joined = outer_join(&a, &b, &JoinKey::new("id", "id")).unwrap();

        assert_eq!(
            rows(&joined),
            vec![
                vec!["a", "1", "A", "x"],
                vec!["b", "2", "B", "y"],
                vec!["c", "3", "C", "z"],
            ]
        );
    }

    #[test]
    fn test_unmatched_left_precedes_unmatched_right() {
        let a = table("a", "id,v\nb,2\nz,26\nm,13\n");
        let b = table("b", "id,w\nB,y\na,x\nq,17\n");

        let joined = outer_join(&a, &b, &JoinKey::new("id", "id")).unwrap();

        assert_eq!(
            rows(&joined),
            vec![
                vec!["b", "2", "B", "y"],
                vec!["m", "13", "", ""],
                vec!["z", "26", "", ""],
                vec!["", "", "a", "x"],
                vec!["", "", "q", "17"],
            ]
        );
    }

    #[test]
    fn test_empty_tables_produce_header_only() {
        let a = table("a", "id,v\n");
        let b = table("b", "id,w\n");

        let joined = outer_join(&a, &b, &JoinKey::new("id", "id")).unwrap();

        assert_eq!(joined.headers(), &["id", "v", "id", "w"]);
        assert!(joined.is_empty());
    }

    #[test]
    fn test_one_empty_side_keeps_other_rows() {
        let a = table("a", "id,v\n");
        let b = table("b", "id,w\nx,1\ny,2\n");

        let joined = outer_join(&a, &b, &JoinKey::new("id", "id")).unwrap();

        assert_eq!(
            rows(&joined),
            vec![vec!["", "", "x", "1"], vec!["", "", "y", "2"]]
        );
    }

    #[test]
    fn test_missing_key_column_is_schema_error() {
        let a = table("marks.csv", "id,v\n");
        let b = table("roster.csv", "id,w\n");

        let err = outer_join(&a, &b, &JoinKey::new("id", "student")).unwrap_err();

        match err {
            RecordsError::Schema { table, column } => {
                assert_eq!(table, "roster.csv");
                assert_eq!(column, "student");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_key_differing_only_in_case_fails() {
        let a = table("marks.csv", "id,v\ns1,1\nS1,2\n");
        let b = table("roster.csv", "id,w\n");

        let err = outer_join(&a, &b, &JoinKey::new("id", "id")).unwrap_err();

        assert!(matches!(err, RecordsError::DuplicateKey { ref table, .. } if table == "marks.csv"));
    }

    #[test]
    fn test_inputs_are_not_reordered() {
        let a = table("a", "id\nb\na\n");
        let b = table("b", "id\nB\n");
        let before = a.clone();

        outer_join(&a, &b, &JoinKey::new("id", "id")).unwrap();

        assert_eq!(a, before);
    }
}
