/*!
 * Tests for the idiom dictionary
 */

use anyhow::Result;
use scriptvox::IdiomMap;

use crate::common;

/// Substitution ignores case and replaces every occurrence
#[test]
fn test_apply_withMixedCaseOccurrences_shouldReplaceAll() -> Result<()> {
    let idioms = IdiomMap::from_pairs([("break a leg", "good luck")])?;

    assert_eq!(
        idioms.apply("Break a leg! I said BREAK A LEG."),
        "good luck! I said good luck."
    );
    Ok(())
}

/// Replacement text is literal, never a capture reference
#[test]
fn test_apply_withDollarInReplacement_shouldInsertLiterally() -> Result<()> {
    let idioms = IdiomMap::from_pairs([("cost an arm and a leg", "cost $1 and $$")])?;
    assert_eq!(idioms.apply("It will cost an arm and a leg."), "It will cost $1 and $$.");
    Ok(())
}

/// Phrases are matched literally, not as patterns
#[test]
fn test_apply_withRegexCharactersInPhrase_shouldMatchLiterally() -> Result<()> {
    let idioms = IdiomMap::from_pairs([("what's up?", "how are you?")])?;

    assert_eq!(idioms.apply("Hey, what's up?"), "Hey, how are you?");
    assert_eq!(idioms.apply("Hey, what's up"), "Hey, what's up");
    Ok(())
}

/// Applying twice equals applying once when replacements hold no phrase
#[test]
fn test_apply_twice_shouldBeIdempotent() -> Result<()> {
    let idioms = IdiomMap::from_pairs([("piece of cake", "very easy"), ("break a leg", "good luck")])?;
    let text = "Break a leg, it's a piece of cake.";

    let once = idioms.apply(text);
    assert_eq!(idioms.apply(&once), once);
    Ok(())
}

/// Earlier entries rewrite the text later entries see
#[test]
fn test_apply_withChainedEntries_shouldFollowInsertionOrder() -> Result<()> {
    let forward = IdiomMap::from_pairs([("hit the sack", "hit the hay"), ("hit the hay", "go to bed")])?;
    assert_eq!(forward.apply("Time to hit the sack."), "Time to go to bed.");

    let backward = IdiomMap::from_pairs([("hit the hay", "go to bed"), ("hit the sack", "hit the hay")])?;
    assert_eq!(backward.apply("Time to hit the sack."), "Time to hit the hay.");
    Ok(())
}

#[test]
fn test_fromPairs_withEmptyPhrase_shouldFail() {
    assert!(IdiomMap::from_pairs([("  ", "nothing")]).is_err());
}

/// Loading keeps the order entries appear in the file
#[test]
fn test_load_withJsonFile_shouldKeepFileOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "idioms.json",
        r#"{"zebra crossing": "crosswalk", "apple of my eye": "my darling", "break a leg": "good luck"}"#,
    )?;

    let idioms = IdiomMap::load(&path)?;

    assert_eq!(
        idioms.phrases().collect::<Vec<_>>(),
        vec!["zebra crossing", "apple of my eye", "break a leg"]
    );
    Ok(())
}

/// A missing dictionary disables substitution instead of failing
#[test]
fn test_load_withMissingFile_shouldReturnEmptyMap() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;

    let idioms = IdiomMap::load(&temp_dir.path().join("absent.json"))?;

    assert!(idioms.is_empty());
    assert_eq!(idioms.apply("Break a leg"), "Break a leg");
    Ok(())
}

#[test]
fn test_load_withNonStringValue_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "idioms.json", r#"{"break a leg": 42}"#)?;

    assert!(IdiomMap::load(&path).is_err());
    Ok(())
}

#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "idioms.json", "[\"not\", \"a map\"]")?;

    assert!(IdiomMap::load(&path).is_err());
    Ok(())
}
