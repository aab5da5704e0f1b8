//! JSON input document consumed by `peakclus run`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use peakclus_core::{DegreesOfFreedom, EdgeList, StatisticMap, StatisticModel, VariateCount};
use serde::Deserialize;
use tracing::{Span, field, instrument};

use super::commands::CliError;

/// Statistic rows: either one flat row or a list of rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatisticRows {
    /// A single primary row.
    Single(Vec<f64>),
    /// Row 0 is primary; later rows feed the multivariate correction.
    Multi(Vec<Vec<f64>>),
}

/// Degrees of freedom as a number or a one- or two-element list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DegreesField {
    /// Scalar form.
    Scalar(f64),
    /// List form.
    List(Vec<f64>),
}

/// A mask entry, accepted as a boolean or as `0`/`1`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum MaskEntry {
    /// Boolean form.
    Flag(bool),
    /// Numeric form; only `0` and `1` are valid.
    Number(u8),
}

/// Parsed input document.
///
/// # Examples
/// ```
/// use peakclus_cli::cli::InputDocument;
///
/// let doc: InputDocument = serde_json::from_str(
///     r#"{ "t": [1.0, 4.0, 2.0], "edges": [[1, 2], [2, 3]], "mask": [1, 1, 0] }"#,
/// )?;
/// assert_eq!(doc.mask()?, vec![true, true, false]);
/// assert_eq!(doc.model(None, None)?.node_count(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDocument {
    /// Statistic rows.
    pub t: StatisticRows,
    /// Degrees of freedom; defaults to `1`.
    #[serde(default)]
    pub df: Option<DegreesField>,
    /// Number of variates; defaults to `1`.
    #[serde(default)]
    pub k: Option<usize>,
    /// Analysis mask; defaults to every node inside.
    #[serde(default)]
    pub mask: Option<Vec<MaskEntry>>,
    /// 1-based adjacency pairs.
    pub edges: Vec<(usize, usize)>,
    /// Optional per-node resel weights.
    #[serde(default)]
    pub resels_per_vertex: Option<Vec<f64>>,
}

impl InputDocument {
    /// Builds the statistic model, letting `k` and `df` override the
    /// document's values.
    ///
    /// # Errors
    /// Returns [`CliError::Core`] when the rows, variate count or degrees of
    /// freedom are invalid.
    pub fn model(&self, k: Option<usize>, df: Option<&[f64]>) -> Result<StatisticModel, CliError> {
        let rows = match &self.t {
            StatisticRows::Single(row) => vec![row.clone()],
            StatisticRows::Multi(rows) => rows.clone(),
        };
        let variates = VariateCount::try_from(k.or(self.k).unwrap_or(1))?;
        let degrees = match (df, &self.df) {
            (Some(values), _) => DegreesOfFreedom::from_slice(values)?,
            (None, Some(DegreesField::Scalar(value))) => DegreesOfFreedom::Single(*value),
            (None, Some(DegreesField::List(values))) => DegreesOfFreedom::from_slice(values)?,
            (None, None) => DegreesOfFreedom::default(),
        };
        Ok(StatisticModel::new(StatisticMap::new(rows)?)
            .with_variate_count(variates)
            .with_degrees_of_freedom(degrees))
    }

    /// Mask as booleans; every node is inside when the document has no mask.
    ///
    /// # Errors
    /// Returns [`CliError::InvalidMask`] for numeric entries other than 0 or 1.
    pub fn mask(&self) -> Result<Vec<bool>, CliError> {
        let Some(entries) = &self.mask else {
            return Ok(vec![true; self.node_count()]);
        };
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match *entry {
                MaskEntry::Flag(flag) => Ok(flag),
                MaskEntry::Number(0) => Ok(false),
                MaskEntry::Number(1) => Ok(true),
                MaskEntry::Number(value) => Err(CliError::InvalidMask { index, value }),
            })
            .collect()
    }

    /// Edge list built from the 1-based pairs.
    ///
    /// # Errors
    /// Returns [`CliError::Edges`] when a pair contains a zero identifier.
    pub fn edge_list(&self) -> Result<EdgeList, CliError> {
        Ok(EdgeList::from_raw_pairs(&self.edges)?)
    }

    fn node_count(&self) -> usize {
        match &self.t {
            StatisticRows::Single(row) => row.len(),
            StatisticRows::Multi(rows) => rows.first().map_or(0, Vec::len),
        }
    }
}

#[instrument(name = "cli.load_input", err, fields(path = field::Empty))]
pub(super) fn load_input(path: &Path) -> Result<InputDocument, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
