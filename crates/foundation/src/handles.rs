/// Opaque handles to primitives owned by a map surface.
///
/// The surface hands these out on construction; the core only stores and passes
/// them back. Values are allocated sequentially per kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolylineId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PopupId(pub u32);
