use tracing::info;

/// Side-effecting row actions a renderer forwards out of the engine.
///
/// The engine never performs these itself; it has no backend to talk to.
/// Renderers hand the selected record ids to an implementation of this
/// port. [`LogActions`] reproduces the reference behavior of logging the
/// request and doing nothing else.
pub trait RowActions {
    fn delete(&mut self, ids: &[usize]);
    fn add_to_collection(&mut self, ids: &[usize]);
}

/// Default action sink: log only.
#[derive(Debug, Default)]
pub struct LogActions;

impl RowActions for LogActions {
    fn delete(&mut self, ids: &[usize]) {
        info!("Delete action for {} selected row(s): {ids:?}", ids.len());
    }

    fn add_to_collection(&mut self, ids: &[usize]) {
        info!(
            "Add to collection action for {} selected row(s): {ids:?}",
            ids.len()
        );
    }
}
