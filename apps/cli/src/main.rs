//! Line-oriented front end for the Bechdel title search.
//!
//! Each input line is the full contents of the search box. `/N` picks the
//! N-th candidate, `/q` quits.

use std::sync::Arc;

use bechdel::{
    spawn_search_controller, BechdelError, BechdelResult, CachedTitleSearch, HttpTitleSearch,
    ResultsPage, SearchSettings, SearchSnapshot, TitleSearch,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "type a title to search, /N to pick a result, /q to quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Text(String),
    Select(usize),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Command {
    let Some(rest) = line.trim().strip_prefix('/') else {
        return Command::Text(line.to_string());
    };
    match rest {
        "q" | "quit" => Command::Quit,
        _ => match rest.parse::<usize>() {
            Ok(position) if position > 0 => Command::Select(position - 1),
            _ => Command::Help,
        },
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(error) = run().await {
        log::error!("bechdel search exited: {error}");
        std::process::exit(1);
    }
}

async fn run() -> BechdelResult<()> {
    let settings = SearchSettings::from_env();
    let http = HttpTitleSearch::new(&settings)?;
    let provider: Arc<dyn TitleSearch> = if settings.cache_enabled() {
        Arc::new(CachedTitleSearch::new(http, &settings))
    } else {
        Arc::new(http)
    };

    let (confirmed_tx, mut confirmed_rx) = mpsc::unbounded_channel::<String>();
    let search = spawn_search_controller(
        settings,
        provider.clone(),
        Arc::new(move |title: &str| {
            let _ = confirmed_tx.send(title.to_string());
        }),
    );
    let mut page = ResultsPage::new(provider);

    let mut snapshots = search.watch();
    tokio::spawn(async move {
        let mut rendered = SearchSnapshot::default();
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            if snapshot.candidates != rendered.candidates
                || snapshot.loading != rendered.loading
                || snapshot.error != rendered.error
            {
                render_snapshot(&snapshot);
            }
            rendered = snapshot;
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Help => println!("{HELP}"),
                    Command::Select(index) => match search.select_index(index).await {
                        Ok(candidate) => page.set_selected_year(Some(candidate.year)),
                        Err(BechdelError::InvalidInput(message)) => println!("{message}"),
                        Err(error) => return Err(error),
                    },
                    Command::Text(text) => search.text_changed(text).await?,
                }
            }
            Some(title) = confirmed_rx.recv() => {
                if page.confirm(&title).await.is_ok() {
                    render_rows(&page);
                }
            }
        }
    }

    search.shutdown();
    Ok(())
}

fn render_snapshot(snapshot: &SearchSnapshot) {
    if snapshot.loading {
        println!("searching for {:?}...", snapshot.query);
        return;
    }
    if let Some(error) = &snapshot.error {
        println!("search unavailable: {error}");
        return;
    }
    for (position, candidate) in snapshot.candidates.iter().enumerate() {
        println!("  {:>2}. {}", position + 1, candidate);
    }
}

fn render_rows(page: &ResultsPage) {
    let rows = page.rows();
    if rows.is_empty() {
        match page.selected_year() {
            Some(year) => println!("no rating found for {year}"),
            None => println!("no rating found"),
        }
        return;
    }
    for row in rows {
        match &row.verdict {
            Some(verdict) => println!("{} ({}): {}", row.display_title, row.year, verdict),
            None => println!("{} ({}): not rated", row.display_title, row.year),
        }
        if let Some(url) = &row.imdb_url {
            println!("    {url}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_search_text() {
        assert_eq!(parse_command("Alien"), Command::Text("Alien".to_string()));
        assert_eq!(parse_command(" "), Command::Text(" ".to_string()));
        assert_eq!(parse_command(""), Command::Text(String::new()));
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_command("/q"), Command::Quit);
        assert_eq!(parse_command("/2"), Command::Select(1));
        assert_eq!(parse_command("/0"), Command::Help);
        assert_eq!(parse_command("/what"), Command::Help);
    }
}
