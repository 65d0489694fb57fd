/// Story assembly properties: tiers, defaults, fallback branch and layout.

use masal_engine::core::assembler::{
    assemble, Source, DEFAULT_FRIEND, DEFAULT_FRIEND_ROLE, DEFAULT_ITEM,
};
use masal_engine::core::format::{self, Block, PARAGRAPH_SEPARATOR};
use masal_engine::core::template::StoryTemplates;
use masal_engine::schema::character::Character;
use masal_engine::schema::config::{StoryConfig, StoryLength};
use masal_engine::schema::item::CustomItem;
use masal_engine::schema::moral::MoralValue;
use masal_engine::schema::theme::{StoryTheme, ThemeKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn config(name: &str, theme: &str, moral: &str, length: StoryLength) -> StoryConfig {
    StoryConfig {
        main_character: Some(Character::main("1", name)),
        theme: Some(StoryTheme::new("1", theme)),
        moral_values: vec![MoralValue::new("2", moral)],
        length: Some(length),
        ..StoryConfig::default()
    }
}

fn story_text(config: &StoryConfig, seed: u64) -> String {
    let templates = StoryTemplates::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    assemble(config, &templates, &mut rng).text
}

const THEMES: [&str; 5] = [
    "Macera",
    "Uzay ve Gezegenler",
    "Deniz Altı",
    "Orman ve Hayvanlar",
    "Sihirli Dünya",
];

#[test]
fn leo_short_adventure() {
    let text = story_text(&config("Leo", "Macera", "Dürüstlük", StoryLength::Short), 1);

    assert!(text.starts_with("# Leo ve Dürüstlük Macerası\n\n"));
    assert!(text.ends_with("\n\n# SON"));

    let paragraphs = format::body_paragraphs(&text);
    assert_eq!(paragraphs.len(), 5);
    assert!(paragraphs[0].starts_with("Leo iki yaşındaydı"));
    assert!(paragraphs[1].starts_with("Bahçede Leo'nin en iyi arkadaşı Zeynep"));
    assert!(paragraphs[4].starts_with("Leo Zeynep'in elini tuttu"));
    assert!(!text.contains("Fatma teyze"));
    assert!(!text.contains("Akşam olduğunda"));
}

#[test]
fn leo_long_adventure_adds_tiers_in_order() {
    let text = story_text(&config("Leo", "Macera", "Dürüstlük", StoryLength::Long), 1);
    let paragraphs = format::body_paragraphs(&text);
    assert_eq!(paragraphs.len(), 12);

    assert!(paragraphs[5].starts_with("Sonra Leo ve Zeynep el ele"));
    assert!(paragraphs[6].starts_with("O gün Leo, en önemli dersi öğrendi"));
    assert!(paragraphs[7].starts_with("Akşam olduğunda, Leo'nin annesi"));
    assert!(paragraphs[10].starts_with("Yemekten sonra, Leo ve Zeynep sihirli kalem ile"));
    assert!(paragraphs[11].starts_with("Ve böylece Leo ve Zeynep yeni maceralarına sihirli kalem ile"));
    assert!(text.ends_with("# SON"));
}

#[test]
fn higher_factor_extends_lower_as_prefix() {
    for theme in THEMES {
        let short = story_text(&config("Ece", theme, "Sabır", StoryLength::Short), 9);
        let medium = story_text(&config("Ece", theme, "Sabır", StoryLength::Medium), 9);
        let long = story_text(&config("Ece", theme, "Sabır", StoryLength::Long), 9);

        let short = format::body_paragraphs(&short);
        let medium = format::body_paragraphs(&medium);
        let long = format::body_paragraphs(&long);

        assert!(medium.len() > short.len(), "{}: medium adds nothing", theme);
        assert!(long.len() > medium.len(), "{}: long adds nothing", theme);
        assert_eq!(&medium[..short.len()], &short[..], "{}", theme);
        assert_eq!(&long[..medium.len()], &medium[..], "{}", theme);
    }
}

#[test]
fn paragraph_counts_per_branch() {
    let expected = [
        ("Macera", [5, 7, 12]),
        ("Uzay ve Gezegenler", [5, 8, 14]),
        ("Deniz Altı", [3, 5, 7]),
    ];
    for (theme, counts) in expected {
        for (length, count) in StoryLength::ALL.into_iter().zip(counts) {
            let text = story_text(&config("Can", theme, "Paylaşma", length), 0);
            assert_eq!(
                format::body_paragraphs(&text).len(),
                count,
                "{} {:?}",
                theme,
                length
            );
        }
    }
}

#[test]
fn no_custom_items_uses_default_item() {
    // The long space story mentions the item in several tiers.
    for seed in 0..10 {
        let text = story_text(
            &config("Mia", "Uzay ve Gezegenler", "Yardımlaşma", StoryLength::Long),
            seed,
        );
        assert!(text.contains(&format!("{}'ı kullanarak", DEFAULT_ITEM)));
        assert!(text.contains(&format!("Belki {} ile yardım edebiliriz", DEFAULT_ITEM)));
    }
}

#[test]
fn no_supporting_characters_uses_default_friend() {
    let templates = StoryTemplates::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let story = assemble(
        &config("Mia", "Macera", "Arkadaşlık", StoryLength::Medium),
        &templates,
        &mut rng,
    );
    assert_eq!(story.resolution.friend.value, DEFAULT_FRIEND);
    assert_eq!(story.resolution.friend_role.value, DEFAULT_FRIEND_ROLE);
    assert_eq!(story.resolution.friend.source, Source::Default);
    assert!(story.text.contains("en iyi arkadaşı Zeynep"));
}

#[test]
fn first_supporting_character_is_the_friend() {
    let mut cfg = config("Mia", "Macera", "Arkadaşlık", StoryLength::Short);
    cfg.supporting_characters = vec![
        Character::supporting("2", "Bilge Baykuş", "Mentor"),
        Character::supporting("3", "Neşeli Tavşan", "Arkadaş"),
    ];
    let text = story_text(&cfg, 0);
    assert!(text.contains("Bilge Baykuş"));
    assert!(!text.contains("Neşeli Tavşan"));
    assert!(!text.contains("Zeynep"));
}

#[test]
fn unknown_theme_uses_generic_branch() {
    let templates = StoryTemplates::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let story = assemble(
        &config("Deniz", "Dinozorlar", "Dürüstlük", StoryLength::Short),
        &templates,
        &mut rng,
    );
    assert_eq!(story.theme_kind, ThemeKind::Generic);
    let body = story.paragraphs().join(PARAGRAPH_SEPARATOR);
    assert!(body.contains("Deniz"));
    assert!(body.contains("Dinozorlar hakkında bir maceraya"));
    assert!(body.contains("Dürüstlük değerini anladım"));
}

#[test]
fn theme_dispatch_is_exact_match() {
    let templates = StoryTemplates::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let story = assemble(
        &config("Ali", "macera", "Sabır", StoryLength::Short),
        &templates,
        &mut rng,
    );
    assert_eq!(story.theme_kind, ThemeKind::Generic);
    assert!(story.text.contains("macera hakkında"));
}

#[test]
fn only_first_moral_value_is_told() {
    let mut cfg = config("Ali", "Deniz Altı", "Sabır", StoryLength::Long);
    cfg.moral_values.push(MoralValue::new("3", "Paylaşma"));
    let text = story_text(&cfg, 0);
    assert!(text.contains("Sabır"));
    assert!(!text.contains("Paylaşma"));
}

#[test]
fn special_item_comes_from_custom_items() {
    let mut cfg = config("Ali", "Macera", "Sabır", StoryLength::Long);
    cfg.custom_items = vec![
        CustomItem::new("1", "Uçan Halı"),
        CustomItem::new("2", "Konuşan Kitap"),
    ];
    let mut seen_both = (false, false);
    for seed in 0..64 {
        let text = story_text(&cfg, seed);
        assert!(!text.contains(DEFAULT_ITEM));
        seen_both.0 |= text.contains("Uçan Halı ile oynamaya");
        seen_both.1 |= text.contains("Konuşan Kitap ile oynamaya");
    }
    assert!(seen_both.0 && seen_both.1, "expected both items to be picked across seeds");
}

#[test]
fn same_seed_same_story() {
    let mut cfg = config("Ali", "Uzay ve Gezegenler", "Sabır", StoryLength::Long);
    cfg.custom_items = vec![
        CustomItem::new("1", "a"),
        CustomItem::new("2", "b"),
        CustomItem::new("3", "c"),
    ];
    assert_eq!(story_text(&cfg, 77), story_text(&cfg, 77));
}

#[test]
fn split_join_round_trip() {
    for theme in THEMES {
        for length in StoryLength::ALL {
            let text = story_text(&config("Zeki", theme, "Dürüstlük", length), 3);
            let parts: Vec<&str> = text.split(PARAGRAPH_SEPARATOR).collect();
            assert_eq!(parts.join(PARAGRAPH_SEPARATOR), text);
        }
    }
}

#[test]
fn blocks_are_heading_body_heading() {
    let templates = StoryTemplates::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let story = assemble(&StoryConfig::default(), &templates, &mut rng);
    let blocks = story.blocks();

    assert_eq!(blocks.first(), Some(&Block::Heading("Çocuk ve Arkadaşlık Macerası")));
    assert_eq!(blocks.last(), Some(&Block::Heading("SON")));
    let headings = blocks
        .iter()
        .filter(|b| matches!(b, Block::Heading(_)))
        .count();
    assert_eq!(headings, 2);
    // Empty config: default theme is the adventure branch at medium length.
    assert_eq!(story.theme_kind, ThemeKind::Adventure);
    assert_eq!(blocks.len(), 2 + 7);
}

#[test]
fn input_is_not_mutated() {
    let cfg = config("Ali", "Macera", "Sabır", StoryLength::Long);
    let before = cfg.clone();
    let _ = story_text(&cfg, 0);
    assert_eq!(cfg, before);
}

fn layout_shape(text: &str) -> (usize, usize) {
    let blocks = format::split_blocks(text);
    let headings = blocks
        .iter()
        .filter(|b| matches!(b, Block::Heading(_)))
        .count();
    (format::body_paragraphs(text).len(), headings)
}

#[test]
fn user_text_cannot_change_story_layout() {
    let baseline = story_text(&config("Leo", "Macera", "Dürüstlük", StoryLength::Long), 4);
    assert_eq!(layout_shape(&baseline), (12, 2));

    for hero in ["Le\n\nLeo", "# Leo", "#", "Leo\r\n\r\n# Leo"] {
        let cfg = config(hero, "Macera", "Dürüstlük", StoryLength::Long);
        assert_eq!(layout_shape(&story_text(&cfg, 4)), (12, 2), "hero {:?}", hero);
    }

    let mut cfg = config("Leo", "Macera", "Dürüstlük\n\n# Sabır", StoryLength::Long);
    cfg.custom_items = vec![CustomItem::new("1", "top\n\nkale")];
    cfg.supporting_characters = vec![Character::supporting("2", "# Ali\n\nVeli", "Mentor")];
    let text = story_text(&cfg, 4);
    assert_eq!(layout_shape(&text), (12, 2));
    assert!(text.contains("top kale ile oynamaya"));
    assert!(text.contains("Ali Veli"));
}
