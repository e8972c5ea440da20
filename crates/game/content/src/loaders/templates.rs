//! Unit catalogue loader.
//!
//! Loads heroes and monsters from RON files as a flat list of
//! [`UnitTemplate`]s.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use lair_core::{Faction, UnitTemplate};

use crate::loaders::{LoadResult, read_file};

/// Loader for unit catalogues from RON files.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load a unit catalogue from a RON file.
    ///
    /// RON format: `Vec<UnitTemplate>`. `dexterity` may be omitted and
    /// defaults to 1.0.
    pub fn load(path: &Path) -> LoadResult<Vec<UnitTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in unit catalogue {}", path.display()))
    }

    /// Parse and validate RON content.
    pub fn parse(content: &str) -> LoadResult<Vec<UnitTemplate>> {
        let templates: Vec<UnitTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalogue RON: {}", e))?;

        let mut names = HashSet::new();
        for template in &templates {
            Self::validate(template)?;
            anyhow::ensure!(
                names.insert(template.name.as_str()),
                "duplicate unit name '{}'",
                template.name
            );
        }
        Ok(templates)
    }

    /// The built-in catalogue shipped with this crate.
    pub fn builtin() -> LoadResult<Vec<UnitTemplate>> {
        Self::parse(crate::BUILTIN_UNITS)
    }

    fn validate(template: &UnitTemplate) -> LoadResult<()> {
        let name = &template.name;
        anyhow::ensure!(!name.is_empty(), "unit name must not be empty");
        anyhow::ensure!(template.life > 0, "unit '{}' must have positive life", name);
        anyhow::ensure!(
            template.attack >= 0,
            "unit '{}' must not have negative attack",
            name
        );
        anyhow::ensure!(
            template.defense.is_finite(),
            "unit '{}' has a non-finite defense",
            name
        );
        anyhow::ensure!(
            template.dexterity.is_finite() && template.dexterity > 0.0,
            "unit '{}' must have positive dexterity",
            name
        );
        Ok(())
    }
}

/// A unit catalogue split by faction, order preserved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalogue {
    pub heroes: Vec<UnitTemplate>,
    pub monsters: Vec<UnitTemplate>,
}

impl Catalogue {
    pub fn new(templates: impl IntoIterator<Item = UnitTemplate>) -> Self {
        let (heroes, monsters) = templates
            .into_iter()
            .partition(|template| template.faction == Faction::Hero);
        Self { heroes, monsters }
    }

    pub fn builtin() -> LoadResult<Self> {
        TemplateLoader::builtin().map(Self::new)
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty() && self.monsters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_catalogue_has_both_factions() {
        let catalogue = Catalogue::builtin().unwrap();
        assert!(!catalogue.heroes.is_empty());
        assert!(!catalogue.monsters.is_empty());
        assert!(catalogue.heroes.iter().all(|t| t.faction == Faction::Hero));

        let bat = catalogue
            .monsters
            .iter()
            .find(|t| t.name == "Bat")
            .unwrap();
        assert_eq!((bat.life, bat.attack, bat.defense), (40, 6, 2.0));
    }

    #[test]
    fn dexterity_defaults_to_one() {
        let templates = TemplateLoader::parse(
            r#"[(name: "Imp", faction: monster, rank: 1, life: 20, attack: 3, defense: 0.5)]"#,
        )
        .unwrap();
        assert_eq!(templates[0].dexterity, 1.0);
        assert_eq!(templates[0].faction, Faction::Monster);
    }

    #[test]
    fn rejects_invalid_units() {
        let dead = r#"[(name: "Ghost", faction: monster, rank: 1, life: 0, attack: 3, defense: 0.0)]"#;
        assert!(TemplateLoader::parse(dead).is_err());

        let duplicate = r#"[
            (name: "Imp", faction: monster, rank: 1, life: 5, attack: 1, defense: 0.0),
            (name: "Imp", faction: monster, rank: 2, life: 9, attack: 2, defense: 0.0),
        ]"#;
        let err = TemplateLoader::parse(duplicate).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[(name: "Squire", faction: hero, rank: 2, life: 30, attack: 5, defense: 1.0, dexterity: 1.1)]"#
        )
        .unwrap();

        let templates = TemplateLoader::load(file.path()).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Squire");
        assert_eq!(templates[0].dexterity, 1.1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemplateLoader::load(&dir.path().join("absent.ron")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn catalogue_preserves_order() {
        let catalogue = Catalogue::new([
            UnitTemplate::new("A", Faction::Monster, 1, 5, 1, 0.0),
            UnitTemplate::new("B", Faction::Hero, 1, 5, 1, 0.0),
            UnitTemplate::new("C", Faction::Monster, 1, 5, 1, 0.0),
        ]);
        let names: Vec<&str> = catalogue.monsters.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(catalogue.heroes.len(), 1);
    }
}
