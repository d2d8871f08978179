use tabled::Table;

use crate::{config, info, types::FeaturedTableRow};

pub async fn featured() {
    let featured = config::featured_playlists();
    if featured.is_empty() {
        info!("No featured playlists configured. Set SPOTIFY_FEATURED_PLAYLISTS.");
        return;
    }

    let table_rows: Vec<FeaturedTableRow> = featured
        .into_iter()
        .enumerate()
        .map(|(index, fp)| FeaturedTableRow {
            index,
            name: fp.name,
            genres: fp.genres,
            id: fp.id,
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
