//! Field annotation parsing.
//!
//! An annotation is a comma-separated string: the first segment is the
//! store key of the field, the remaining segments are flags. Unknown flags
//! are ignored so newer annotations stay readable by older engines.
//!
//! | flag       | meaning                                                    |
//! |------------|------------------------------------------------------------|
//! | `computed` | the field is written back to the store on encode           |
//! | `sub`      | the store wraps the field's value in a one-element list/set |

/// Flag marking a field as eligible for write-back.
pub const COMPUTED_FLAG: &str = "computed";

/// Flag marking a singleton-wrapped block.
pub const SUB_FLAG: &str = "sub";

/// A parsed field annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldTag<'a> {
    /// Store-relative path segment.
    pub key: &'a str,
    pub computed: bool,
    pub sub: bool,
}

impl<'a> FieldTag<'a> {
    /// Parse an annotation.
    ///
    /// Returns `None` when the annotation has no usable key; such a field is
    /// treated as untagged.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagbind::FieldTag;
    ///
    /// let tag = FieldTag::parse("block,computed,sub").unwrap();
    /// assert_eq!(tag.key, "block");
    /// assert!(tag.computed && tag.sub);
    /// assert!(FieldTag::parse(",computed").is_none());
    /// ```
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut segments = raw.split(',');
        let key = segments.next()?.trim();
        if key.is_empty() {
            return None;
        }
        let mut tag = Self {
            key,
            computed: false,
            sub: false,
        };
        for flag in segments.map(str::trim) {
            match flag {
                COMPUTED_FLAG => tag.computed = true,
                SUB_FLAG => tag.sub = true,
                _ => {}
            }
        }
        Some(tag)
    }
}
