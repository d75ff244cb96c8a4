pub(crate) mod alpha;
pub(crate) mod blend;
pub(crate) mod blur;
