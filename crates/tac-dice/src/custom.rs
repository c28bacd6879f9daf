//! User-defined dice and the registry that resolves them.

use serde::{Deserialize, Serialize};

use crate::die::DieType;
use crate::face::FaceValue;
use crate::id::{CustomDieId, FaceId};

/// One face of a custom die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFace {
    /// Face identifier.
    pub id: FaceId,
    /// Face label; need not be numeric.
    pub content: String,
}

impl CustomFace {
    /// Create a face with a fresh id.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: FaceId::new(),
            content: content.into(),
        }
    }
}

/// A preset face layout that replaces a die's faces wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceTemplate {
    /// Six sequential numbers, 1 through 6.
    Numbers,
    /// `HIT` / `MISS`.
    Binary,
    /// `CRIT`, two `HIT`, two `MISS`, `FUMBLE`.
    Critical,
}

impl FaceTemplate {
    /// Face labels of this template, in order.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Numbers => &["1", "2", "3", "4", "5", "6"],
            Self::Binary => &["HIT", "MISS"],
            Self::Critical => &["CRIT", "HIT", "HIT", "MISS", "MISS", "FUMBLE"],
        }
    }

    fn faces(self) -> Vec<CustomFace> {
        self.labels().iter().map(|l| CustomFace::new(*l)).collect()
    }
}

/// A user-defined die with arbitrary faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDieDefinition {
    /// Unique identifier, referenced by [`DieType::CustomRef`].
    pub id: CustomDieId,
    /// Display name.
    pub name: String,
    /// Display color given to results rolled with this die.
    pub color: String,
    /// Ordered faces; never emptied through the editing methods.
    pub sides: Vec<CustomFace>,
}

impl CustomDieDefinition {
    /// Create a die with the numeric six-face template.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: CustomDieId::new(),
            name: name.into(),
            color: color.into(),
            sides: FaceTemplate::Numbers.faces(),
        }
    }

    /// Append a face labelled with its 1-based position.
    pub fn add_face(&mut self) -> FaceId {
        let face = CustomFace::new((self.sides.len() + 1).to_string());
        let id = face.id.clone();
        self.sides.push(face);
        id
    }

    /// Remove a face. Refuses to remove the last one.
    pub fn remove_face(&mut self, face: &FaceId) -> bool {
        if self.sides.len() <= 1 {
            return false;
        }
        let before = self.sides.len();
        self.sides.retain(|s| &s.id != face);
        self.sides.len() < before
    }

    /// Change a face's label. Returns true if the face exists.
    pub fn set_face_content(&mut self, face: &FaceId, content: impl Into<String>) -> bool {
        match self.sides.iter_mut().find(|s| &s.id == face) {
            Some(side) => {
                side.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Replace every face with a template's faces.
    pub fn apply_template(&mut self, template: FaceTemplate) {
        self.sides = template.faces();
    }
}

/// A custom die as seen by the roll engine.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDie<'a> {
    /// Display color of the die.
    pub color: &'a str,
    /// Ordered faces, never empty.
    pub faces: &'a [CustomFace],
}

impl ResolvedDie<'_> {
    /// Face labels in order.
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.content.as_str())
    }
}

/// The set of custom dice currently defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomDieRegistry {
    dice: Vec<CustomDieDefinition>,
}

impl CustomDieRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from existing definitions.
    pub fn from_dice(dice: Vec<CustomDieDefinition>) -> Self {
        Self { dice }
    }

    /// All definitions, in creation order.
    pub fn dice(&self) -> &[CustomDieDefinition] {
        &self.dice
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Whether no custom dice are defined.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &CustomDieId) -> Option<&CustomDieDefinition> {
        self.dice.iter().find(|d| &d.id == id)
    }

    /// Look up a definition by id for editing.
    pub fn get_mut(&mut self, id: &CustomDieId) -> Option<&mut CustomDieDefinition> {
        self.dice.iter_mut().find(|d| &d.id == id)
    }

    /// Resolve a die type to a custom die.
    ///
    /// Standard dice, dangling references and faceless definitions all
    /// resolve to `None`, and are rolled numerically instead.
    pub fn resolve(&self, die: &DieType) -> Option<ResolvedDie<'_>> {
        let def = self.get(die.custom_id()?)?;
        if def.sides.is_empty() {
            return None;
        }
        Some(ResolvedDie {
            color: &def.color,
            faces: &def.sides,
        })
    }

    /// Whether a die type is anything other than one of the seven standard
    /// side counts. See [`DieType::is_custom`].
    pub fn is_custom(&self, die: &DieType) -> bool {
        die.is_custom()
    }

    /// Define a new die named `Asset N` with the numeric template.
    pub fn create(&mut self, color: impl Into<String>) -> CustomDieId {
        let die = CustomDieDefinition::new(format!("Asset {}", self.dice.len() + 1), color);
        let id = die.id.clone();
        self.dice.push(die);
        id
    }

    /// Add an existing definition.
    pub fn insert(&mut self, die: CustomDieDefinition) {
        self.dice.push(die);
    }

    /// Remove a definition, returning it if it existed.
    pub fn remove(&mut self, id: &CustomDieId) -> Option<CustomDieDefinition> {
        let pos = self.dice.iter().position(|d| &d.id == id)?;
        Some(self.dice.remove(pos))
    }

    /// Every face an entry of this die type can show: deduplicated, sorted
    /// numerically when all faces are numbers, lexicographically otherwise.
    pub fn achievable_faces(&self, die: &DieType) -> Vec<FaceValue> {
        let mut faces: Vec<FaceValue> = Vec::new();
        match self.resolve(die) {
            Some(resolved) => {
                for content in resolved.contents() {
                    let value = FaceValue::from(content);
                    if !faces.contains(&value) {
                        faces.push(value);
                    }
                }
            }
            None => faces.extend((1..=i64::from(die.sides())).map(FaceValue::Number)),
        }

        if faces.iter().all(|f| f.as_number().is_some()) {
            faces.sort_by(|a, b| {
                let a = a.as_number().unwrap_or_default();
                let b = b.as_number().unwrap_or_default();
                a.total_cmp(&b)
            });
        } else {
            faces.sort_by_key(ToString::to_string);
        }
        faces
    }
}
