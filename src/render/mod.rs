mod frame;
mod layout;
mod terminal;

pub(crate) use layout::Layout;
pub(crate) use terminal::{ScannerView, TerminalSession};
