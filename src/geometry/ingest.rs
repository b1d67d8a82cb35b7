use tracing::debug;

use crate::geometry::fragment::{CurveFragment, NormalSign};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// A curve record as delivered by the host's selection.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCurve {
    Line {
        start: Point3,
        end: Point3,
    },
    Arc {
        center: Point3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        normal: Vector3,
    },
    /// Any other entity kind (spline, ellipse, text, ...).
    Other { kind: String },
}

/// Why a host curve did not become a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Unsupported { index: usize, kind: String },
    OffPlane { index: usize },
    Degenerate { index: usize, reason: String },
}

/// The plane shared by every fragment of a working set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingPlane {
    pub elevation: f64,
    pub normal: NormalSign,
}

/// Parameters controlling ingestion.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Allowed elevation drift and normal tilt.
    pub tolerance: f64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { tolerance: 1e-6 }
    }
}

/// Result of [`ingest`].
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub fragments: Vec<CurveFragment>,
    /// Plane of the first accepted curve; `None` if nothing was accepted.
    pub plane: Option<WorkingPlane>,
    pub rejected: Vec<Rejection>,
}

/// Converts host curve records into fragments on a single working plane.
///
/// Lines keep their orientation. Arcs must have a normal parallel to ±Z; the
/// first accepted curve fixes the elevation and everything off that plane is
/// rejected. Arc angles are interpreted in the arc's own plane (see
/// [`crate::geometry::ArcFragment`]).
#[must_use]
pub fn ingest<I>(records: I, options: IngestOptions) -> Ingested
where
    I: IntoIterator<Item = HostCurve>,
{
    let mut out = Ingested::default();
    let tol = options.tolerance;

    for (index, record) in records.into_iter().enumerate() {
        let (elevation, normal, built) = match record {
            HostCurve::Other { kind } => {
                debug!(index, %kind, "rejecting unsupported curve kind");
                out.rejected.push(Rejection::Unsupported { index, kind });
                continue;
            }
            HostCurve::Line { start, end } => {
                if (start.z - end.z).abs() > tol {
                    debug!(index, "rejecting line that leaves the working plane");
                    out.rejected.push(Rejection::OffPlane { index });
                    continue;
                }
                let built =
                    CurveFragment::segment(Point2::new(start.x, start.y), Point2::new(end.x, end.y));
                (start.z, out.plane.map(|p| p.normal), built)
            }
            HostCurve::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                normal,
            } => {
                let Some(normal) = planar_normal(&normal, tol) else {
                    debug!(index, "rejecting arc with a tilted normal");
                    out.rejected.push(Rejection::OffPlane { index });
                    continue;
                };
                let built = CurveFragment::arc(
                    Point2::new(center.x, center.y),
                    radius,
                    start_angle,
                    end_angle,
                    normal,
                );
                (center.z, Some(normal), built)
            }
        };

        if let Some(plane) = out.plane {
            if (plane.elevation - elevation).abs() > tol {
                debug!(index, elevation, expected = plane.elevation, "rejecting curve at another elevation");
                out.rejected.push(Rejection::OffPlane { index });
                continue;
            }
        }

        match built {
            Ok(fragment) => {
                if out.plane.is_none() {
                    out.plane = Some(WorkingPlane {
                        elevation,
                        normal: normal.unwrap_or(NormalSign::Positive),
                    });
                }
                out.fragments.push(fragment);
            }
            Err(err) => {
                debug!(index, %err, "rejecting degenerate curve");
                out.rejected.push(Rejection::Degenerate {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    out
}

/// Returns the normal orientation if `normal` is parallel to ±Z.
fn planar_normal(normal: &Vector3, tolerance: f64) -> Option<NormalSign> {
    let unit = normal.try_normalize(TOLERANCE)?;
    if unit.x.abs() > tolerance || unit.y.abs() > tolerance {
        return None;
    }
    Some(NormalSign::from_z(unit.z))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> HostCurve {
        HostCurve::Line {
            start: Point3::new(x0, y0, z),
            end: Point3::new(x1, y1, z),
        }
    }

    #[test]
    fn accepts_lines_and_arcs_on_one_plane() {
        let records = vec![
            line(0.0, 0.0, 1.0, 0.0, 2.0),
            HostCurve::Arc {
                center: Point3::new(0.0, 0.0, 2.0),
                radius: 1.0,
                start_angle: 0.0,
                end_angle: FRAC_PI_2,
                normal: Vector3::z(),
            },
        ];
        let out = ingest(records, IngestOptions::default());
        assert_eq!(out.fragments.len(), 2);
        assert!(out.rejected.is_empty());
        let plane = out.plane.unwrap();
        assert!((plane.elevation - 2.0).abs() < 1e-12);
        assert_eq!(plane.normal, NormalSign::Positive);
    }

    #[test]
    fn rejects_other_kinds_at_the_boundary() {
        let records = vec![
            HostCurve::Other {
                kind: "SPLINE".into(),
            },
            line(0.0, 0.0, 1.0, 0.0, 0.0),
        ];
        let out = ingest(records, IngestOptions::default());
        assert_eq!(out.fragments.len(), 1);
        assert_eq!(
            out.rejected,
            vec![Rejection::Unsupported {
                index: 0,
                kind: "SPLINE".into()
            }]
        );
    }

    #[test]
    fn rejects_curves_off_the_working_plane() {
        let records = vec![
            line(0.0, 0.0, 1.0, 0.0, 0.0),
            line(1.0, 0.0, 1.0, 1.0, 5.0),
            line(0.0, 0.0, 0.0, 1.0, 0.0),
            HostCurve::Arc {
                center: Point3::origin(),
                radius: 1.0,
                start_angle: 0.0,
                end_angle: 1.0,
                normal: Vector3::new(1.0, 0.0, 1.0),
            },
        ];
        let out = ingest(records, IngestOptions::default());
        assert_eq!(out.fragments.len(), 2);
        assert_eq!(
            out.rejected,
            vec![Rejection::OffPlane { index: 1 }, Rejection::OffPlane { index: 3 }]
        );
    }

    #[test]
    fn degenerate_curves_are_reported_not_fatal() {
        let records = vec![line(1.0, 1.0, 1.0, 1.0, 0.0), line(0.0, 0.0, 2.0, 0.0, 0.0)];
        let out = ingest(records, IngestOptions::default());
        assert_eq!(out.fragments.len(), 1);
        assert!(matches!(out.rejected[0], Rejection::Degenerate { index: 0, .. }));
    }

    #[test]
    fn negative_normal_arc_sets_plane_orientation() {
        let records = vec![HostCurve::Arc {
            center: Point3::origin(),
            radius: 1.0,
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            normal: -Vector3::z(),
        }];
        let out = ingest(records, IngestOptions::default());
        assert_eq!(out.plane.unwrap().normal, NormalSign::Negative);
    }
}
