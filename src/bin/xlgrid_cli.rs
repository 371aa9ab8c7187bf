//! CLI tool for xlgrid - fetches a sheet from the backend and prints it as TSV
//!
//! Usage:
//!   xlgrid_cli <base-url> <workbook-id> <sheet>           # Whole used range
//!   xlgrid_cli <base-url> <workbook-id> <sheet> A1:D20    # Just this range
//!
//! Set `XLGRID_LOG=debug` to see requests on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    use std::cell::RefCell;
    use std::env;
    use std::rc::Rc;

    use xlgrid::grid::clipboard::range_to_tsv;
    use xlgrid::{
        parse_range, BackendConfig, CellPos, CellStore, HttpBackend, SelectionRange, SyncGateway,
    };

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: xlgrid_cli <base-url> <workbook-id> <sheet> [range]");
        std::process::exit(1);
    }
    let level = env::var("XLGRID_LOG").unwrap_or_default();
    xlgrid::logging::init(xlgrid::logging::parse_level(&level));

    let config = BackendConfig::new(&args[1], &args[2]);
    let sheet = &args[3];

    let backend = match HttpBackend::new(&config) {
        Ok(b) => Rc::new(b),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let store = Rc::new(RefCell::new(CellStore::new()));
    let gateway = SyncGateway::new(
        backend,
        Rc::clone(&store),
        config.workbook_id.clone(),
        false,
    );

    let loaded = match gateway.refresh(sheet).await {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error fetching {}: {}", sheet, e);
            std::process::exit(1);
        }
    };
    eprintln!("Fetched {} cell(s) from {}", loaded, sheet);

    let store = store.borrow();
    let range = match args.get(4) {
        Some(text) => match parse_range(text) {
            Ok((start, end)) => SelectionRange::new(start, end),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            // Used range: bounding box of every cell the backend returned.
            let bounds = store
                .sheet(sheet)
                .into_iter()
                .flat_map(|cells| cells.keys())
                .filter_map(|address| CellPos::from_address(address).ok())
                .fold(None, |acc: Option<(CellPos, CellPos)>, p| {
                    Some(match acc {
                        None => (p, p),
                        Some((lo, hi)) => (
                            CellPos::new(lo.row.min(p.row), lo.col.min(p.col)),
                            CellPos::new(hi.row.max(p.row), hi.col.max(p.col)),
                        ),
                    })
                });
            let Some((start, end)) = bounds else {
                return;
            };
            SelectionRange::new(start, end)
        }
    };

    println!("{}", range_to_tsv(&store, sheet, &range));
}

#[cfg(target_arch = "wasm32")]
fn main() {}
