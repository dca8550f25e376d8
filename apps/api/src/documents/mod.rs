// Upstream document handling: turns uploaded files into plain text before
// any model stage sees them.

pub mod pdf;
