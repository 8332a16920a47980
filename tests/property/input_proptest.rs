//! Input normalisation invariants

use proptest::prelude::*;

use campusconnect::shared::error::{non_blank, require_text};
use campusconnect::shared::models::{clean_options, TagsInput};

proptest! {
    #[test]
    fn tags_are_trimmed_and_non_empty(raw in "[a-z ,]{0,40}") {
        let tags = TagsInput::Text(raw.clone()).into_tags();
        for tag in &tags {
            prop_assert!(!tag.is_empty());
            prop_assert_eq!(tag.trim(), tag.as_str());
            prop_assert!(!tag.contains(','));
        }
        let expected = raw.split(',').filter(|part| !part.trim().is_empty()).count();
        prop_assert_eq!(tags.len(), expected);
    }

    #[test]
    fn list_and_text_tags_agree(parts in prop::collection::vec("[a-z]{1,8}", 0..6)) {
        let from_list = TagsInput::List(parts.clone()).into_tags();
        let from_text = TagsInput::Text(parts.join(", ")).into_tags();
        prop_assert_eq!(from_list, from_text);
    }

    #[test]
    fn poll_options_never_blank(options in prop::collection::vec("[ a-z]{0,6}", 0..8)) {
        let cleaned = clean_options(options.clone());
        prop_assert!(cleaned.iter().all(|option| !option.is_empty()));
        prop_assert!(cleaned.len() <= options.len());
    }

    #[test]
    fn non_blank_and_require_text_agree(value in "[ a-z]{0,10}") {
        let required = require_text("field", Some(&value)).ok();
        prop_assert_eq!(required, non_blank(Some(value)));
    }
}
