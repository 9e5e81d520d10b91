mod app;
mod commands;
mod fuzzy;
mod view;

use scour_core::config::Config;
use scour_core::options::OptionTree;

/// Run the interactive cleaner window until the user quits.
pub fn run(config: Config, tree: OptionTree) -> color_eyre::Result<()> {
    app::run(config, tree)
}
