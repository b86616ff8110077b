//! # findhdr CLI
//!
//! Command-line interface for the HDR bracket finder.
//!
//! ## Usage
//! ```bash
//! findhdr ~/Pictures/2017/02
//! findhdr --min 3 --max 5 ~/Pictures/2017/02
//! findhdr --link ./out ~/Pictures/2017/03
//! ```

mod cli;

use hdr_finder::Result;

fn main() -> Result<()> {
    cli::run()
}
