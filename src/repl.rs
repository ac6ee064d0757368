use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use crate::http::Transport;
use crate::nps::model::NationalSite;
use crate::nps::{NpsCrawl, StateIndex};
use crate::places::PlacesClient;

const STATE_PROMPT: &str = "Enter a state name (e.g. Michigan, michigan) or \"exit\"\n:";
const SITE_PROMPT: &str = "Choose the number for detail search or \"exit\" or \"back\"\n:";

/// What a line typed at the state prompt means
#[derive(Debug, PartialEq, Eq)]
pub enum StateInput<'a> {
    Exit,
    /// a known state and the URL of its page
    Known(&'a str, &'a str),
    Unknown,
}

/// What a line typed at the site prompt means
#[derive(Debug, PartialEq, Eq)]
pub enum SiteInput {
    Back,
    Exit,
    /// zero-based index into the listed sites
    Select(usize),
    Invalid,
}

pub fn classify_state_input<'a>(line: &str, states: &'a StateIndex) -> StateInput<'a> {
    let line = line.trim().to_lowercase();
    if line == "exit" {
        return StateInput::Exit;
    }
    match states.get_key_value(&line) {
        Some((name, url)) => StateInput::Known(name, url),
        None => StateInput::Unknown,
    }
}

pub fn classify_site_input(line: &str, site_count: usize) -> SiteInput {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "back" => SiteInput::Back,
        "exit" => SiteInput::Exit,
        number if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) => {
            match number.parse::<usize>() {
                Ok(n) if (1..=site_count).contains(&n) => SiteInput::Select(n - 1),
                _ => SiteInput::Invalid,
            }
        }
        _ => SiteInput::Invalid,
    }
}

#[derive(Debug)]
struct Listing {
    state: String,
    sites: Vec<NationalSite>,
}

#[derive(Debug)]
enum Stage {
    StateSelect,
    SiteList(Listing),
    SiteSelect(Listing),
    Exit,
}

/// The interactive prompt: pick a state, then pick sites in it to see what is nearby
pub struct Repl<'a, T, R, W> {
    crawl: &'a NpsCrawl<T>,
    places: &'a PlacesClient<T>,
    input: R,
    output: W,
}

impl<'a, T, R, W> Repl<'a, T, R, W>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(crawl: &'a NpsCrawl<T>, places: &'a PlacesClient<T>, input: R, output: W) -> Self {
        Self {
            crawl,
            places,
            input,
            output,
        }
    }

    pub async fn run(mut self) -> color_eyre::Result<()> {
        let states = self.crawl.state_index().await?;
        let mut stage = Stage::StateSelect;
        loop {
            stage = match stage {
                Stage::StateSelect => self.select_state(&states).await?,
                Stage::SiteList(listing) => {
                    self.print_sites(&listing)?;
                    Stage::SiteSelect(listing)
                }
                Stage::SiteSelect(listing) => self.select_site(listing).await?,
                Stage::Exit => return Ok(()),
            };
        }
    }

    async fn select_state(&mut self, states: &StateIndex) -> color_eyre::Result<Stage> {
        let Some(line) = self.prompt(STATE_PROMPT).await? else {
            return Ok(Stage::Exit);
        };
        match classify_state_input(&line, states) {
            StateInput::Exit => Ok(Stage::Exit),
            StateInput::Known(state, url) => {
                let sites = self.crawl.sites_for_state(url).await?;
                Ok(Stage::SiteList(Listing { state: state.to_string(), sites }))
            }
            StateInput::Unknown => {
                writeln!(self.output, "[Error] Enter proper state name\n")?;
                Ok(Stage::StateSelect)
            }
        }
    }

    fn print_sites(&mut self, listing: &Listing) -> color_eyre::Result<()> {
        print_divider(&mut self.output)?;
        writeln!(self.output, "List of national sites in {}", listing.state)?;
        print_divider(&mut self.output)?;
        for (idx, site) in listing.sites.iter().enumerate() {
            writeln!(self.output, "[{}] {}", idx + 1, site)?;
        }
        Ok(())
    }

    async fn select_site(&mut self, listing: Listing) -> color_eyre::Result<Stage> {
        let Some(line) = self.prompt(SITE_PROMPT).await? else {
            return Ok(Stage::Exit);
        };
        match classify_site_input(&line, listing.sites.len()) {
            SiteInput::Back => Ok(Stage::StateSelect),
            SiteInput::Exit => Ok(Stage::Exit),
            SiteInput::Select(idx) => {
                self.show_nearby(&listing.sites[idx]).await?;
                Ok(Stage::SiteSelect(listing))
            }
            SiteInput::Invalid => {
                writeln!(self.output, "[Error] Invalid input\n")?;
                print_divider(&mut self.output)?;
                Ok(Stage::SiteSelect(listing))
            }
        }
    }

    async fn show_nearby(&mut self, listed: &NationalSite) -> color_eyre::Result<()> {
        // the listing may come from an older scrape, go back to the detail page
        let site = match &listed.url {
            Some(url) => self.crawl.site_detail(url).await?,
            None => listed.clone(),
        };
        let places = self.places.nearby_places(&site).await?;

        print_divider(&mut self.output)?;
        writeln!(self.output, "Places near {}", site.name)?;
        print_divider(&mut self.output)?;
        for place in &places {
            writeln!(self.output, "- {}", place)?;
        }
        Ok(())
    }

    /// print `text` and read one line, `None` once input is exhausted
    async fn prompt(&mut self, text: &str) -> color_eyre::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn print_divider(output: &mut impl Write) -> std::io::Result<()> {
    writeln!(output, "{}", "-".repeat(50))
}
