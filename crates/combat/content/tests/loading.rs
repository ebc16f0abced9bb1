use std::fs;

use combat_content::loaders::bundle::{CONFIG_FILE, EFFECTS_FILE, SKILLS_FILE};
use combat_content::{ConfigLoader, ContentBundle, SkillLoader};
use combat_core::{
    CombatEnv, EffectId, ElementSet, FixedRolls, Formula, SkillId, SkillOracle,
};

#[test]
fn embedded_bundle_is_consistent() {
    let bundle = ContentBundle::embedded().expect("embedded content");
    let issues = bundle.validate();
    assert!(issues.is_empty(), "embedded content has issues: {issues:?}");

    let rng = FixedRolls::unlucky();
    let env = CombatEnv::new(&bundle.skills, &bundle.effects, &rng, &bundle.config);
    assert!(env.skills().skill(SkillId(1)).is_some());
}

#[test]
fn directory_overrides_fall_back_per_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(SKILLS_FILE),
        r#"[
            (
                id: 40,
                name: "Ice Shard",
                cooldown: 12,
                formula: Constant(9),
                elements: "ICE",
                follow_up: Some(41),
            ),
        ]"#,
    )
    .expect("write skills");
    fs::write(dir.path().join(CONFIG_FILE), "despawn_delay = 5\ndeath_effect = 7\n")
        .expect("write config");

    let bundle = ContentBundle::load_dir(dir.path()).expect("load dir");
    assert_eq!(bundle.skills.len(), 1);
    let shard = bundle.skills.get(SkillId(40)).expect("shard");
    assert_eq!(shard.elements, ElementSet::ICE);
    assert_eq!(shard.formula, Formula::Constant(9));
    assert_eq!(bundle.config.despawn_delay, 5);

    // effects.ron was not written, so the embedded effects are used
    assert!(!dir.path().join(EFFECTS_FILE).exists());
    assert!(bundle.effects.contains(EffectId(99)));

    let issues = bundle.validate();
    assert_eq!(issues.len(), 2, "{issues:?}");
    assert!(issues.iter().any(|i| i.contains("unknown skill 41")));
    assert!(issues.iter().any(|i| i.contains("death_effect 7")));
}

#[test]
fn parse_errors_name_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SKILLS_FILE);
    fs::write(&path, "[ (id: 1, name: ").expect("write");

    let err = SkillLoader::load(&path).expect_err("truncated RON");
    let message = format!("{err:#}");
    assert!(message.contains(SKILLS_FILE), "{message}");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ConfigLoader::load(&dir.path().join("absent.toml")).expect_err("missing");
    assert!(format!("{err:#}").contains("failed to read"));
}
