//! Coordinate systems: ordered, append-only collections of dimensions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use super::dimension::{Dimension, DimensionKind, DimensionRecord};
use super::error::IdentityError;
use super::ids::{join_global_id, parse_global_id, NAMESPACE_SEPARATOR};

/// Prefix for labels handed out by auto-labeling.
const AUTO_LABEL_PREFIX: &str = "dim_";

/// An ordered collection of dimensions sharing one id namespace.
///
/// Dimensions are appended, never removed. `used_labels` tracks every local
/// id that is taken, including labels reserved by
/// [`DimensionBuilder::build_for`](super::DimensionBuilder::build_for) but
/// not yet attached.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "CoordinateSystemRecord", into = "CoordinateSystemRecord")]
pub struct CoordinateSystem {
    id: String,
    description: Option<String>,
    dimensions: Vec<Dimension>,
    index: HashMap<String, usize>,
    used_labels: HashSet<String>,
    auto_label_counter: usize,
}

impl CoordinateSystem {
    /// Creates an empty coordinate system.
    ///
    /// # Errors
    /// `InvalidIdentity` if `id` is empty or contains the `#` separator,
    /// since the id becomes the owner part of every dimension's global id.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityError> {
        let id = id.into();
        check_system_id(&id)?;
        Ok(Self {
            id,
            description: None,
            dimensions: Vec::new(),
            index: HashMap::new(),
            used_labels: HashSet::new(),
            auto_label_counter: 0,
        })
    }

    /// Creates a coordinate system from already-built dimensions.
    ///
    /// # Errors
    /// `InvalidIdentity` for an unusable id, `OwnershipConflict` if a
    /// dimension declares a different owner, `DuplicateLabel` if two
    /// dimensions share a local id.
    pub fn create(
        id: impl Into<String>,
        dimensions: impl IntoIterator<Item = Dimension>,
    ) -> Result<Self, IdentityError> {
        let mut cs = Self::new(id)?;
        for dimension in dimensions {
            cs.attach(dimension)?;
        }
        Ok(cs)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Looks up an attached dimension by local id.
    pub fn dimension(&self, local_id: &str) -> Option<&Dimension> {
        self.index.get(local_id).map(|&i| &self.dimensions[i])
    }

    /// Global ids of all attached dimensions, in order.
    pub fn global_ids(&self) -> Vec<String> {
        self.dimensions.iter().map(Dimension::global_id).collect()
    }

    /// Returns true if `label` is taken, attached or reserved.
    pub fn is_label_used(&self, label: &str) -> bool {
        self.used_labels.contains(label)
    }

    /// Builds a new dimension owned by this system and appends it.
    ///
    /// Without a label the next free `dim_N` is used.
    ///
    /// # Errors
    /// `DuplicateLabel` if `label` is already used.
    pub fn add_dimension(
        &mut self,
        unit: impl Into<String>,
        kind: Option<DimensionKind>,
        label: Option<&str>,
    ) -> Result<&Dimension, IdentityError> {
        let dimension = Dimension::builder(unit)
            .maybe_kind(kind)
            .maybe_label(label.map(str::to_string))
            .build_for(self)?;
        self.attach(dimension)
    }

    /// Appends an already-built dimension.
    ///
    /// The dimension must be owned by this system or be standalone; a
    /// standalone dimension stays standalone. A label reserved by
    /// [`DimensionBuilder::build_for`](super::DimensionBuilder::build_for)
    /// can only be taken by a dimension owned by this system.
    pub fn attach(&mut self, dimension: Dimension) -> Result<&Dimension, IdentityError> {
        if let Some(owner) = dimension.coordinate_system_id() {
            if owner != self.id {
                return Err(IdentityError::OwnershipConflict {
                    dimension: dimension.global_id(),
                    owner: owner.to_string(),
                    coordinate_system: self.id.clone(),
                });
            }
        }
        let reserved_elsewhere =
            !dimension.is_owned() && self.used_labels.contains(dimension.local_id());
        if reserved_elsewhere || self.index.contains_key(dimension.local_id()) {
            return Err(IdentityError::DuplicateLabel {
                label: dimension.local_id().to_string(),
                coordinate_system: self.id.clone(),
            });
        }

        let position = self.dimensions.len();
        self.used_labels.insert(dimension.local_id().to_string());
        self.index.insert(dimension.local_id().to_string(), position);
        self.dimensions.push(dimension);
        Ok(&self.dimensions[position])
    }

    pub(crate) fn reserve_label(&mut self, label: &str) -> Result<(), IdentityError> {
        if !self.used_labels.insert(label.to_string()) {
            return Err(IdentityError::DuplicateLabel {
                label: label.to_string(),
                coordinate_system: self.id.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn next_auto_label(&mut self) -> String {
        loop {
            let label = format!("{AUTO_LABEL_PREFIX}{}", self.auto_label_counter);
            self.auto_label_counter += 1;
            if self.used_labels.insert(label.clone()) {
                return label;
            }
        }
    }
}

impl PartialEq for CoordinateSystem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.description == other.description
            && self.dimensions == other.dimensions
    }
}

fn check_system_id(id: &str) -> Result<(), IdentityError> {
    if id.is_empty() {
        return Err(IdentityError::invalid("coordinate system id is empty"));
    }
    if id.contains(NAMESPACE_SEPARATOR) {
        return Err(IdentityError::invalid(format!(
            "coordinate system id '{id}' contains '{NAMESPACE_SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Returns the single owner id shared by the dimensions that declare one.
///
/// Standalone dimensions are ignored; `None` if none declares an owner.
///
/// # Errors
/// `MultipleOwners` if more than one distinct owner id is present.
pub fn extract_owner_id<'a>(
    dimensions: impl IntoIterator<Item = &'a Dimension>,
) -> Result<Option<String>, IdentityError> {
    let owners: BTreeSet<&str> = dimensions
        .into_iter()
        .filter_map(Dimension::coordinate_system_id)
        .collect();

    match owners.len() {
        0 => Ok(None),
        1 => Ok(owners.into_iter().next().map(str::to_string)),
        _ => Err(IdentityError::MultipleOwners {
            owners: owners.into_iter().map(str::to_string).collect(),
        }),
    }
}

/// Serialized form: dimensions carry local ids, qualified on read.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CoordinateSystemRecord {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    dimensions: Vec<DimensionRecord>,
}

impl TryFrom<CoordinateSystemRecord> for CoordinateSystem {
    type Error = IdentityError;

    fn try_from(record: CoordinateSystemRecord) -> Result<Self, Self::Error> {
        let mut cs = CoordinateSystem::new(record.id)?;
        cs.description = record.description;
        for mut dimension in record.dimensions {
            if parse_global_id(&dimension.id).0.is_none() {
                dimension.id = join_global_id(Some(&cs.id), &dimension.id);
            }
            cs.attach(Dimension::try_from(dimension)?)?;
        }
        Ok(cs)
    }
}

impl From<CoordinateSystem> for CoordinateSystemRecord {
    fn from(cs: CoordinateSystem) -> Self {
        let dimensions = cs
            .dimensions
            .into_iter()
            .map(|d| {
                let local_id = d.local_id().to_string();
                let mut record = DimensionRecord::from(d);
                record.id = local_id;
                record
            })
            .collect();
        CoordinateSystemRecord {
            id: cs.id,
            description: cs.description,
            dimensions,
        }
    }
}
