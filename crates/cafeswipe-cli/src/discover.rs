//! Command handlers: the interactive discovery loop and the saved listing.

use cafeswipe_client::{
    DiscoveryError, FixedLocation, JsonFileStore, RelayClient, SearchParams, Session, View,
};
use cafeswipe_core::{ClientConfig, Coordinates};
use tokio::io::{AsyncBufReadExt, BufReader};

const PROMPT: &str = "[s]ave  [n]ext  [v]iew saved  [d]iscover again  [q]uit";

/// One line of user input in the discovery loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Save,
    Skip,
    ViewSaved,
    Discover,
    Quit,
}

impl Action {
    pub(crate) fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "s" | "save" => Some(Self::Save),
            "n" | "next" | "skip" => Some(Self::Skip),
            "v" | "saved" | "view" => Some(Self::ViewSaved),
            "d" | "discover" => Some(Self::Discover),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Builds the location provider from `--lat`/`--lng`. Both must be present
/// for a position to exist; with either missing, discovery reports the
/// location as unavailable.
///
/// # Errors
///
/// Returns an error if both are given but out of range.
pub(crate) fn location_from_args(
    lat: Option<f64>,
    lng: Option<f64>,
) -> anyhow::Result<FixedLocation> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(FixedLocation::at(Coordinates::new(lat, lng)?)),
        _ => Ok(FixedLocation::unavailable()),
    }
}

fn open_session(config: &ClientConfig) -> anyhow::Result<Session<JsonFileStore>> {
    let relay = RelayClient::new(&config.relay_url, config.timeout_secs)?;
    let store = JsonFileStore::new(&config.saved_path);
    let session = Session::open(relay, SearchParams::from_config(config), store)?;
    tracing::debug!(
        relay = %config.relay_url,
        saved_path = %config.saved_path.display(),
        saved = session.registry().saved().len(),
        "session opened"
    );
    Ok(session)
}

/// Runs the interactive loop until `q` or end of input.
///
/// # Errors
///
/// Returns an error if the saved list cannot be opened or stdin fails.
/// Discovery and save failures are reported and the loop continues.
pub(crate) async fn run_discover(
    config: &ClientConfig,
    location: FixedLocation,
) -> anyhow::Result<()> {
    let mut session = open_session(config)?;
    discover_and_print(&mut session, &location).await;
    println!("{PROMPT}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(action) = Action::parse(&line) else {
            println!("{PROMPT}");
            continue;
        };

        match action {
            Action::Save => match session.save() {
                Ok(Some(view)) => print_view(session.relay(), &view),
                Ok(None) => println!("Nothing to save here."),
                Err(e) => {
                    tracing::error!(error = %e, "failed to persist saved list");
                    eprintln!("Could not save: {e}");
                }
            },
            Action::Skip => match session.skip() {
                Some(view) => print_view(session.relay(), &view),
                None => println!("Nothing to skip here."),
            },
            Action::ViewSaved => {
                let view = session.show_saved();
                print_view(session.relay(), &view);
            }
            Action::Discover => discover_and_print(&mut session, &location).await,
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Prints the saved list as text, or as card markup when `html` is set.
///
/// # Errors
///
/// Returns an error if the saved list cannot be read.
pub(crate) fn run_saved(config: &ClientConfig, html: bool) -> anyhow::Result<()> {
    let mut session = open_session(config)?;
    let view = session.show_saved();
    if html {
        println!("{}", view.to_html());
    } else {
        print_view(session.relay(), &view);
    }
    Ok(())
}

async fn discover_and_print(session: &mut Session<JsonFileStore>, location: &FixedLocation) {
    match session.discover(location).await {
        Ok(view) => print_view(session.relay(), &view),
        Err(e) => {
            tracing::warn!(error = %e, "discovery failed");
            eprintln!("{}", failure_notice(&e));
        }
    }
}

/// User-facing text for a failed discovery.
pub(crate) fn failure_notice(error: &DiscoveryError) -> String {
    match error {
        DiscoveryError::LocationUnavailable(_) => {
            "Location unavailable. Pass --lat and --lng (or set CAFESWIPE_LAT / CAFESWIPE_LNG)."
                .to_string()
        }
        DiscoveryError::Network(_) => "Could not reach the relay. Try again.".to_string(),
        DiscoveryError::InvalidRelayUrl { url, .. } => {
            format!("CAFESWIPE_RELAY_URL '{url}' is not a valid URL.")
        }
        DiscoveryError::Upstream { status, .. } => {
            format!("Failed to fetch cafes (HTTP {status}). Try again.")
        }
    }
}

fn print_view(relay: &RelayClient, view: &View) {
    print!("{}", render_text(relay, view));
}

/// Plain-text rendering of a view, with photo links made absolute.
pub(crate) fn render_text(relay: &RelayClient, view: &View) -> String {
    if let Some(message) = view.message() {
        return format!("{message}\n");
    }

    let cards = match view {
        View::Card(card) => std::slice::from_ref(card),
        View::Saved(cards) => cards.as_slice(),
        _ => &[],
    };

    cards
        .iter()
        .map(|card| {
            format!(
                "☕ {}\n   ⭐ {}\n   {}\n",
                card.name,
                card.rating,
                relay.absolute(&card.image_src)
            )
        })
        .collect()
}
