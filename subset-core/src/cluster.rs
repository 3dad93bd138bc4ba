//! Clusters and partitions over a dataset's rows

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// RGB display color of a cluster, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::InvalidArgument(format!("Invalid color: {s}")));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidArgument(format!("Invalid color: {s}")))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A named group of row indices into a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Display name
    name: String,

    /// Stable identifier, independent of the name
    #[serde(default)]
    id: String,

    /// Display color
    #[serde(default)]
    color: Color,

    /// Row indices in the associated dataset, unordered
    indices: Vec<u32>,
}

impl Cluster {
    /// Create a cluster with the given name and indices
    pub fn new(name: impl Into<String>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            id: String::new(),
            color: Color::default(),
            indices,
        }
    }

    /// Set the identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the color
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Row indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Replace the row indices, keeping all other attributes
    pub fn set_indices(&mut self, indices: Vec<u32>) {
        self.indices = indices;
    }

    /// Number of member rows
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the cluster has no member rows
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// An ordered collection of clusters over one dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partition {
    clusters: Vec<Cluster>,
}

impl Partition {
    /// Create an empty partition
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a partition from clusters, dropping empty ones
    pub fn from_clusters(clusters: impl IntoIterator<Item = Cluster>) -> Self {
        let mut partition = Self::new();
        for cluster in clusters {
            partition.add_cluster(cluster);
        }
        partition
    }

    /// Append a cluster
    ///
    /// Returns `false` and discards the cluster if it has no indices.
    pub fn add_cluster(&mut self, cluster: Cluster) -> bool {
        if cluster.is_empty() {
            return false;
        }
        self.clusters.push(cluster);
        true
    }

    /// Clusters in insertion order
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Iterate over clusters
    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the partition has no clusters
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

impl IntoIterator for Partition {
    type Item = Cluster;
    type IntoIter = std::vec::IntoIter<Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.into_iter()
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}
