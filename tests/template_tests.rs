/// Template and catalog data-file tests.

use masal_engine::core::catalog::Catalog;
use masal_engine::core::template::{Slot, StoryTemplates};
use masal_engine::schema::theme::ThemeKind;

const BRANCHES: [ThemeKind; 3] = [ThemeKind::Adventure, ThemeKind::Space, ThemeKind::Generic];

#[test]
fn template_file_loads_from_disk() {
    let path = std::path::Path::new("story_data/templates.ron");
    let templates = StoryTemplates::load_from_ron(path).unwrap();
    for kind in BRANCHES {
        let branch = templates.branch(kind);
        assert!(!branch.opening.is_empty(), "{} has no opening", kind.name());
        assert!(!branch.extended.is_empty(), "{} has no extended tier", kind.name());
        assert!(!branch.full.is_empty(), "{} has no full tier", kind.name());
    }
}

#[test]
fn title_mentions_hero_and_moral() {
    let templates = StoryTemplates::builtin().unwrap();
    assert!(templates.title.uses(Slot::Hero));
    assert!(templates.title.uses(Slot::Moral));
}

#[test]
fn every_paragraph_names_someone() {
    let templates = StoryTemplates::builtin().unwrap();
    for kind in BRANCHES {
        let branch = templates.branch(kind);
        for template in branch.paragraphs(3) {
            assert!(
                template.uses(Slot::Hero) || template.uses(Slot::Friend),
                "{}: paragraph without any character: {:?}",
                kind.name(),
                template
            );
        }
    }
}

#[test]
fn generic_opening_personalizes_theme_and_moral() {
    let templates = StoryTemplates::builtin().unwrap();
    let opening = &templates.generic.opening;
    assert!(opening.iter().any(|t| t.uses(Slot::Theme)));
    assert!(opening.iter().any(|t| t.uses(Slot::Moral)));
    assert!(opening.iter().any(|t| t.uses(Slot::Item)));
}

#[test]
fn catalog_themes_cover_every_branch() {
    let catalog = Catalog::builtin().unwrap();
    for kind in BRANCHES {
        assert!(
            catalog.themes.iter().any(|t| t.kind() == kind),
            "no catalog theme dispatches to {}",
            kind.name()
        );
    }
}

#[test]
fn catalog_file_loads_from_disk() {
    let path = std::path::Path::new("story_data/catalog.ron");
    let catalog = Catalog::load_from_ron(path).unwrap();
    assert!(catalog.roles.iter().any(|r| r == "Mentor"));
    assert!(catalog.roles.iter().any(|r| r == "Öğretmen"));
}
