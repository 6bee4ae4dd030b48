//! Resource naming convention.
//!
//! A resource type declares its singular name once; the collection it lives
//! in is that name plus a literal suffix. There is no grammatical
//! pluralization: a `person` resource lives under `persons` unless it picks a
//! different suffix.

/// A type that can be addressed by the fluent client.
///
/// ```
/// use clutch_core::Resource;
///
/// struct Room;
///
/// impl Resource for Room {
///     const NAME: &'static str = "room";
/// }
///
/// assert_eq!(clutch_core::collection_name::<Room>(), "rooms");
/// ```
pub trait Resource {
    /// Singular name as it appears in URLs.
    const NAME: &'static str;

    /// Appended to `NAME` to form the collection segment.
    const PLURAL_SUFFIX: &'static str = "s";
}

/// Collection segment for `R`: `R::NAME` followed by `R::PLURAL_SUFFIX`.
pub fn collection_name<R: Resource + ?Sized>() -> String {
    format!("{}{}", R::NAME, R::PLURAL_SUFFIX)
}
