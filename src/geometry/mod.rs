pub mod fragment;
pub mod ingest;
pub mod loops;

pub use fragment::{ArcFragment, CurveFragment, NormalSign, SegmentFragment, Traversal};
pub use ingest::{ingest, HostCurve, IngestOptions, Ingested, Rejection, WorkingPlane};
pub use loops::{Loop, LoopVertex, Orientation};
