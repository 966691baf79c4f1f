//! Dimensions: single axes of a coordinate space.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coordinate_system::CoordinateSystem;
use super::error::IdentityError;
use super::ids::{join_global_id, parse_global_id, NAMESPACE_SEPARATOR};

/// The unit string that index dimensions must carry.
pub const INDEX_UNIT: &str = "index";

const SPATIAL_UNITS: &[&str] = &[
    "angstrom",
    "attometer",
    "centimeter",
    "decimeter",
    "exameter",
    "feet",
    "femtometer",
    "foot",
    "gigameter",
    "hectometer",
    "inch",
    "inches",
    "kilometer",
    "megameter",
    "meter",
    "micrometer",
    "mile",
    "millimeter",
    "nanometer",
    "parsec",
    "petameter",
    "picometer",
    "terameter",
    "yard",
    "yoctometer",
    "yottameter",
    "zeptometer",
    "zettameter",
    "um",
    "µm",
    "nm",
    "mm",
    "cm",
    "km",
    "m",
];

const TEMPORAL_UNITS: &[&str] = &[
    "attosecond",
    "centisecond",
    "day",
    "decisecond",
    "exasecond",
    "femtosecond",
    "gigasecond",
    "hectosecond",
    "hour",
    "kilosecond",
    "megasecond",
    "microsecond",
    "millisecond",
    "minute",
    "nanosecond",
    "petasecond",
    "picosecond",
    "second",
    "terasecond",
    "yoctosecond",
    "yottasecond",
    "zeptosecond",
    "zettasecond",
    "s",
    "ms",
    "us",
    "µs",
    "ns",
    "min",
    "h",
];

/// What physical quantity a dimension measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionKind {
    Space,
    Time,
    Other,
    Index,
}

impl DimensionKind {
    /// Infers a kind from a unit string.
    ///
    /// Exactly `index` maps to [`DimensionKind::Index`], known length units to
    /// [`DimensionKind::Space`], known time units to [`DimensionKind::Time`]
    /// and anything else to [`DimensionKind::Other`]. Plural and British
    /// spellings (`micrometers`, `metre`) are recognised.
    pub fn infer(unit: &str) -> Self {
        if unit == INDEX_UNIT {
            return DimensionKind::Index;
        }
        let unit = unit.trim().to_lowercase();
        if unit_in(&unit, SPATIAL_UNITS) {
            DimensionKind::Space
        } else if unit_in(&unit, TEMPORAL_UNITS) {
            DimensionKind::Time
        } else {
            DimensionKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionKind::Space => "space",
            DimensionKind::Time => "time",
            DimensionKind::Other => "other",
            DimensionKind::Index => "index",
        }
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn unit_in(unit: &str, table: &[&str]) -> bool {
    let unit = unit.replace("metre", "meter");
    if table.contains(&unit.as_str()) {
        return true;
    }
    // Plurals only for spelled-out names; "ms" is not the plural of "m".
    match unit.strip_suffix('s') {
        Some(singular) if singular.len() > 2 => table.contains(&singular),
        _ => false,
    }
}

/// One axis of a coordinate space.
///
/// A dimension is either *unowned* (standalone, identified by its local id)
/// or *owned* by exactly one coordinate system. Ownership is fixed at
/// construction; a dimension is never re-parented.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DimensionRecord", into = "DimensionRecord")]
pub struct Dimension {
    local_id: String,
    coordinate_system_id: Option<String>,
    unit: String,
    kind: DimensionKind,
}

impl Dimension {
    /// Starts building a dimension measured in `unit`.
    pub fn builder(unit: impl Into<String>) -> DimensionBuilder {
        DimensionBuilder {
            unit: unit.into(),
            kind: None,
            label: None,
            fully_qualified_id: None,
        }
    }

    /// Local id, unique within the owning coordinate system.
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// Id of the owning coordinate system, if any.
    pub fn coordinate_system_id(&self) -> Option<&str> {
        self.coordinate_system_id.as_deref()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn kind(&self) -> DimensionKind {
        self.kind
    }

    pub fn is_owned(&self) -> bool {
        self.coordinate_system_id.is_some()
    }

    /// `owner#local` when owned, the local id alone otherwise.
    pub fn global_id(&self) -> String {
        join_global_id(self.coordinate_system_id.as_deref(), &self.local_id)
    }

    /// Short human-readable description used in diagnostics.
    pub fn summary(&self) -> String {
        format!("{} ({}, {})", self.global_id(), self.kind, self.unit)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.global_id())
    }
}

/// Builder for [`Dimension`].
///
/// Identity comes from exactly one of: a fully qualified id, a label
/// (standalone), or an owner (via [`DimensionBuilder::build_for`]) with an
/// optional label.
#[derive(Clone, Debug)]
pub struct DimensionBuilder {
    unit: String,
    kind: Option<DimensionKind>,
    label: Option<String>,
    fully_qualified_id: Option<String>,
}

impl DimensionBuilder {
    /// Sets the kind explicitly instead of inferring it from the unit.
    pub fn kind(mut self, kind: DimensionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the local id.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the identity from a global id such as `stage#x`.
    pub fn fully_qualified_id(mut self, id: impl Into<String>) -> Self {
        self.fully_qualified_id = Some(id.into());
        self
    }

    pub(crate) fn maybe_kind(mut self, kind: Option<DimensionKind>) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn maybe_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Builds a dimension without an owner object.
    ///
    /// A fully qualified id containing `#` yields an owned dimension; one
    /// without a separator, or a bare label, yields a standalone dimension.
    pub fn build(self) -> Result<Dimension, IdentityError> {
        let kind = resolve_kind(&self.unit, self.kind)?;

        let (owner, local_id) = match (self.fully_qualified_id, self.label) {
            (Some(_), Some(_)) => {
                return Err(IdentityError::invalid(
                    "both a fully qualified id and a label were given",
                ))
            }
            (Some(id), None) => {
                let (owner, local) = parse_global_id(&id);
                if let Some(owner) = owner {
                    if owner.is_empty() {
                        return Err(IdentityError::invalid(format!(
                            "'{id}' has an empty coordinate system id"
                        )));
                    }
                }
                check_local_id(local)?;
                (owner.map(str::to_string), local.to_string())
            }
            (None, Some(label)) => {
                check_local_id(&label)?;
                (None, label)
            }
            (None, None) => {
                return Err(IdentityError::invalid(
                    "a fully qualified id, a label, or an owner is required",
                ))
            }
        };

        Ok(Dimension {
            local_id,
            coordinate_system_id: owner,
            unit: self.unit,
            kind,
        })
    }

    /// Builds a dimension owned by `owner`.
    ///
    /// The label is reserved in the owner's label set; without a label the
    /// owner hands out the next free `dim_N`. The dimension is not appended
    /// to the owner, see [`CoordinateSystem::attach`].
    pub fn build_for(self, owner: &mut CoordinateSystem) -> Result<Dimension, IdentityError> {
        if self.fully_qualified_id.is_some() {
            return Err(IdentityError::invalid(
                "a fully qualified id cannot be combined with an owner",
            ));
        }
        let kind = resolve_kind(&self.unit, self.kind)?;

        let local_id = match self.label {
            Some(label) => {
                check_local_id(&label)?;
                owner.reserve_label(&label)?;
                label
            }
            None => owner.next_auto_label(),
        };

        Ok(Dimension {
            local_id,
            coordinate_system_id: Some(owner.id().to_string()),
            unit: self.unit,
            kind,
        })
    }
}

fn resolve_kind(unit: &str, kind: Option<DimensionKind>) -> Result<DimensionKind, IdentityError> {
    let kind = kind.unwrap_or_else(|| DimensionKind::infer(unit));
    if kind == DimensionKind::Index && unit != INDEX_UNIT {
        return Err(IdentityError::InconsistentKind {
            kind,
            unit: unit.to_string(),
        });
    }
    Ok(kind)
}

fn check_local_id(local_id: &str) -> Result<(), IdentityError> {
    if local_id.is_empty() {
        return Err(IdentityError::invalid("local id is empty"));
    }
    if local_id.contains(NAMESPACE_SEPARATOR) {
        return Err(IdentityError::invalid(format!(
            "local id '{local_id}' contains '{NAMESPACE_SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Serialized form of a dimension: `{"id", "unit", "type"}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct DimensionRecord {
    pub id: String,
    pub unit: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DimensionKind>,
}

impl TryFrom<DimensionRecord> for Dimension {
    type Error = IdentityError;

    fn try_from(record: DimensionRecord) -> Result<Self, Self::Error> {
        Dimension::builder(record.unit)
            .maybe_kind(record.kind)
            .fully_qualified_id(record.id)
            .build()
    }
}

impl From<Dimension> for DimensionRecord {
    fn from(dimension: Dimension) -> Self {
        DimensionRecord {
            id: dimension.global_id(),
            unit: dimension.unit,
            kind: Some(dimension.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kind() {
        assert_eq!(DimensionKind::infer("index"), DimensionKind::Index);
        assert_eq!(DimensionKind::infer("micrometer"), DimensionKind::Space);
        assert_eq!(DimensionKind::infer("micrometers"), DimensionKind::Space);
        assert_eq!(DimensionKind::infer("Millimetre"), DimensionKind::Space);
        assert_eq!(DimensionKind::infer("second"), DimensionKind::Time);
        assert_eq!(DimensionKind::infer("ms"), DimensionKind::Time);
        assert_eq!(DimensionKind::infer("arbitrary"), DimensionKind::Other);
        assert_eq!(DimensionKind::infer("ns"), DimensionKind::Time);
        assert_eq!(DimensionKind::infer("Index"), DimensionKind::Other);
        assert_eq!(DimensionKind::infer(" index"), DimensionKind::Other);
    }

    #[test]
    fn test_inferred_kind_never_violates_index_rule() {
        for unit in ["Index", " index", "INDEX"] {
            let d = Dimension::builder(unit).label("i").build().unwrap();
            assert_eq!(d.kind(), DimensionKind::Other, "unit {unit:?}");
        }
        let json = serde_json::json!({"id": "raw#i", "unit": "Index"});
        assert!(serde_json::from_value::<Dimension>(json).is_ok());
    }

    #[test]
    fn test_fully_qualified_owned() {
        let d = Dimension::builder("micrometer")
            .fully_qualified_id("stage#x")
            .build()
            .unwrap();
        assert_eq!(d.coordinate_system_id(), Some("stage"));
        assert_eq!(d.local_id(), "x");
        assert_eq!(d.global_id(), "stage#x");
        assert_eq!(d.kind(), DimensionKind::Space);
    }

    #[test]
    fn test_fully_qualified_standalone() {
        let d = Dimension::builder("second")
            .fully_qualified_id("t")
            .build()
            .unwrap();
        assert!(!d.is_owned());
        assert_eq!(d.global_id(), "t");
        assert_eq!(d.kind(), DimensionKind::Time);
    }

    #[test]
    fn test_label_standalone() {
        let d = Dimension::builder("pixel").label("c").build().unwrap();
        assert_eq!(d.global_id(), "c");
        assert_eq!(d.kind(), DimensionKind::Other);
    }

    #[test]
    fn test_no_identity_is_invalid() {
        let err = Dimension::builder("meter").build().unwrap_err();
        assert!(matches!(err, IdentityError::InvalidIdentity { .. }));
    }

    #[test]
    fn test_both_identities_is_invalid() {
        let err = Dimension::builder("meter")
            .label("x")
            .fully_qualified_id("cs#x")
            .build()
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidIdentity { .. }));
    }

    #[test]
    fn test_empty_parts_are_invalid() {
        for id in ["", "#x", "cs#"] {
            let err = Dimension::builder("meter")
                .fully_qualified_id(id)
                .build()
                .unwrap_err();
            assert!(
                matches!(err, IdentityError::InvalidIdentity { .. }),
                "id {id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_index_kind_requires_index_unit() {
        let err = Dimension::builder("meter")
            .kind(DimensionKind::Index)
            .label("i")
            .build()
            .unwrap_err();
        assert!(matches!(err, IdentityError::InconsistentKind { .. }));

        let ok = Dimension::builder("index")
            .kind(DimensionKind::Index)
            .label("i")
            .build()
            .unwrap();
        assert_eq!(ok.unit(), "index");
    }

    #[test]
    fn test_explicit_kind_overrides_inference() {
        let d = Dimension::builder("micrometer")
            .kind(DimensionKind::Other)
            .label("x")
            .build()
            .unwrap();
        assert_eq!(d.kind(), DimensionKind::Other);
    }

    #[test]
    fn test_build_for_auto_labels() {
        let mut cs = CoordinateSystem::new("physical").unwrap();
        let a = Dimension::builder("micrometer").build_for(&mut cs).unwrap();
        let b = Dimension::builder("micrometer").build_for(&mut cs).unwrap();
        assert_eq!(a.global_id(), "physical#dim_0");
        assert_eq!(b.global_id(), "physical#dim_1");
    }

    #[test]
    fn test_build_for_rejects_qualified_id() {
        let mut cs = CoordinateSystem::new("physical").unwrap();
        let err = Dimension::builder("micrometer")
            .fully_qualified_id("other#x")
            .build_for(&mut cs)
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidIdentity { .. }));
    }

    #[test]
    fn test_serde_record() {
        let d = Dimension::builder("micrometer")
            .fully_qualified_id("stage#x")
            .build()
            .unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "stage#x", "unit": "micrometer", "type": "space"})
        );
        let back: Dimension = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_serde_rejects_inconsistent_kind() {
        let json = serde_json::json!({"id": "i", "unit": "meter", "type": "index"});
        assert!(serde_json::from_value::<Dimension>(json).is_err());
    }
}
