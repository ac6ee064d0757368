use std::sync::LazyLock;
use color_eyre::eyre::{bail, eyre};
use scraper::{ElementRef, Html, Selector};
use crate::nps::model::NationalSite;
use crate::utils::absolute_url;

static STATE_LIST_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul.dropdown-menu.SearchBar-keywordSearch").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

static PARK_LIST_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div#parkListResults").unwrap());
static PARK_HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());

static HERO_TITLE_CONTAINER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.Hero-titleContainer").unwrap());
static HERO_TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.Hero-title").unwrap());
static HERO_DESIGNATION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.Hero-designationContainer span.Hero-designation").unwrap());
static FOOTER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.ParkFooter").unwrap());
static FOOTER_ADDRESS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.adr").unwrap());
static POSTAL_CODE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.postal-code").unwrap());
static LOCALITY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"span[itemprop="addressLocality"]"#).unwrap());
static REGION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"span[itemprop="addressRegion"]"#).unwrap());
static PHONE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.tel").unwrap());

/// nps.gov home page, which carries the "find a park by state" dropdown. i.e. https://www.nps.gov/index.htm
#[derive(Debug)]
pub struct IndexPage {
    pub states: Vec<StateLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLink {
    /// lower-cased display name, e.g. "michigan"
    pub name: String,
    pub url: String,
}

impl IndexPage {
    pub fn parse_html(html: &str, base_url: &str) -> color_eyre::Result<Self> {
        let document = Html::parse_document(html);
        let state_list = document.select(&STATE_LIST_SELECTOR).next()
            .ok_or_else(|| eyre!("No state list found, page structure might be changed"))?;

        let mut states = Vec::new();
        for item in state_list.children().filter_map(ElementRef::wrap).filter(|e| e.value().name() == "li") {
            let href = item.select(&LINK_SELECTOR).next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| eyre!("No state link found - {}", item.html()))?;
            states.push(StateLink {
                name: element_text(&item).to_lowercase(),
                url: absolute_url(base_url, href),
            });
        }
        if states.is_empty() {
            bail!("No state found, page structure might be changed");
        }
        Ok(
            Self {
                states,
            }
        )
    }
}

/// nps.gov state page. i.e. https://www.nps.gov/state/mi/index.htm
#[derive(Debug)]
pub struct StatePage {
    /// detail page URLs in document order
    pub site_urls: Vec<String>,
}

impl StatePage {
    pub fn parse_html(html: &str, base_url: &str) -> color_eyre::Result<Self> {
        let document = Html::parse_document(html);
        let results = document.select(&PARK_LIST_SELECTOR).next()
            .ok_or_else(|| eyre!("No park list found, page structure might be changed"))?;

        let site_urls = results.select(&PARK_HEADING_SELECTOR)
            .map(|heading| {
                let href = heading.select(&LINK_SELECTOR).next()
                    .and_then(|a| a.value().attr("href"))
                    .ok_or_else(|| eyre!("No park link found - {}", heading.html()))?;
                Ok(format!("{}index.htm", absolute_url(base_url, href)))
            })
            .collect::<color_eyre::Result<Vec<_>>>()?;

        Ok(
            Self {
                site_urls,
            }
        )
    }
}

/// nps.gov site detail page. i.e. https://www.nps.gov/isro/index.htm
#[derive(Debug)]
pub struct SiteDetailPage {
    name: String,
    category: String,
    locality: String,
    region: String,
    zipcode: String,
    phone: String,
}

impl SiteDetailPage {
    pub fn parse_html(html: &str) -> color_eyre::Result<Self> {
        let document = Html::parse_document(html);

        let hero = select_one(document.root_element(), &HERO_TITLE_CONTAINER_SELECTOR, "hero title container")?;
        let name = select_one(hero, &HERO_TITLE_SELECTOR, "site name")?;
        let category = select_one(hero, &HERO_DESIGNATION_SELECTOR, "site designation")?;

        let footer = select_one(document.root_element(), &FOOTER_SELECTOR, "park footer")?;
        let address = select_one(footer, &FOOTER_ADDRESS_SELECTOR, "footer address")?;
        let zipcode = select_one(address, &POSTAL_CODE_SELECTOR, "postal code")?;
        let locality = select_one(address, &LOCALITY_SELECTOR, "address locality")?;
        let region = select_one(address, &REGION_SELECTOR, "address region")?;
        let phone = select_one(footer, &PHONE_SELECTOR, "phone")?;

        Ok(
            Self {
                name: element_text(&name),
                category: element_text(&category),
                locality: element_text(&locality),
                region: element_text(&region),
                zipcode: element_text(&zipcode),
                phone: element_text(&phone),
            }
        )
    }

    /// "City, Region"
    fn address(&self) -> String {
        format!("{}, {}", self.locality, self.region)
    }
}

impl From<SiteDetailPage> for NationalSite {
    fn from(page: SiteDetailPage) -> Self {
        Self {
            address: page.address(),
            category: page.category,
            name: page.name,
            zipcode: page.zipcode,
            phone: page.phone,
            url: None,
        }
    }
}

fn select_one<'a>(parent: ElementRef<'a>, selector: &Selector, what: &str) -> color_eyre::Result<ElementRef<'a>> {
    parent.select(selector).next()
        .ok_or_else(|| eyre!("No {} found, page structure might be changed", what))
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
pub mod fixtures {
    pub const INDEX_HTML: &str = r#"
<html><body>
<div class="SearchBar">
  <ul class="dropdown-menu SearchBar-keywordSearch">
    <li><a href="/state/mi/index.htm">Michigan</a></li>
    <li><a href="/state/wy/index.htm">Wyoming</a></li>
    <li><a href="/state/dc/index.htm">District of Columbia</a></li>
  </ul>
</div>
</body></html>"#;

    pub const MICHIGAN_HTML: &str = r#"
<html><body>
<div id="parkListResults">
  <ul>
    <li class="clearfix">
      <h2>National Park</h2>
      <h3><a href="/isro/">Isle Royale</a></h3>
      <h4>Houghton, MI</h4>
      <p>Explore a rugged, isolated island...</p>
    </li>
  </ul>
</div>
</body></html>"#;

    pub const ISLE_ROYALE_HTML: &str = r#"
<html><body>
<div class="Hero-titleContainer clearfix">
  <a href="/isro/" class="Hero-title">Isle Royale</a>
  <div class="Hero-designationContainer">
    <span class="Hero-designation">National Park</span>
    <span class="Hero-location">MI</span>
  </div>
</div>
<div class="ParkFooter">
  <div class="ParkFooter-contact">
    <p class="adr">
      <span itemprop="streetAddress">800 East Lakeshore Drive</span><br>
      <span itemprop="addressLocality">Houghton</span>,
      <span itemprop="addressRegion">MI</span>
      <span class="postal-code">49931
      </span>
    </p>
    <p>
      <span class="tel">
(906) 482-0984
      </span>
    </p>
  </div>
</div>
</body></html>"#;
}
