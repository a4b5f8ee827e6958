use thiserror::Error;

/// Errors raised by the demand accounting layer.
///
/// A failure terminal event is *not* represented here; it is a first-class
/// protocol value carried by [`Terminal::Failed`](crate::subscriber::Terminal)
/// and never interpreted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
  /// A negative bounded demand was constructed at the boundary. Rejected
  /// synchronously, no partial state is created.
  #[error("bounded demand cannot be negative (requested {requested})")]
  InvalidDemand { requested: i64 },

  /// A delivery was attempted while outstanding demand was exhausted. The
  /// engine never takes this path itself; it exists so a misbehaving external
  /// producer fails loudly in debug builds.
  #[error("delivery attempted with no outstanding demand")]
  NoDemand,
}
