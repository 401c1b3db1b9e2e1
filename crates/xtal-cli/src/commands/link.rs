use crate::cli::LinkArgs;
use crate::error::Result;
use tracing::info;
use xtalgrid::core::io::menu::load_menu;
use xtalgrid::core::models::cocktail::DistanceWeights;
use xtalgrid::workflows::optimize;
use xtalgrid::workflows::params::ChemistryParams;

pub fn run(args: LinkArgs) -> Result<()> {
    let mut menu = load_menu(&args.menu)?;
    info!("Loaded {} cocktails from '{}'.", menu.len(), args.menu.display());

    let weights = match &args.params {
        Some(path) => {
            let params = ChemistryParams::load(path)?;
            params.apply_to_menu(&mut menu);
            params.distance
        }
        None => DistanceWeights::default(),
    };

    let ranked = optimize::rank_similar(&menu, args.well, &weights)?;
    println!(
        "Cocktails most similar to well {} ('{}'):",
        args.well,
        menu.get(args.well)
            .and_then(|c| c.number.as_deref())
            .unwrap_or("unnamed")
    );
    for entry in ranked.into_iter().take(args.count) {
        println!(
            "  well {:>3}  {:<16}  distance {:.4}",
            entry.well,
            entry.number.as_deref().unwrap_or("unnamed"),
            entry.distance
        );
    }
    Ok(())
}
