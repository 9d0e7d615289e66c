use crate::config::Config;
use crate::design::{DesignError, DesignPage};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("ChromeError: {0}")]
    ChromeError(#[from] anyhow::Error),
    #[error("DesignError: {0}")]
    DesignError(#[from] DesignError),
}

pub type Result<T> = std::result::Result<T, BrowserError>;

pub struct Browser(headless_chrome::Browser);

impl Browser {
    pub fn launch(config: &Config) -> Result<Self> {
        let options = headless_chrome::LaunchOptions {
            headless: config.options.headless_browser,
            ..Default::default()
        };
        Ok(Self(headless_chrome::Browser::new(options)?))
    }

    fn url_to_tab(&self, url: &str) -> Result<Arc<headless_chrome::Tab>> {
        let tab = self.0.new_tab()?;
        tab.navigate_to(url)?.wait_until_navigated()?;
        Ok(tab)
    }

    /// Navigates to a validated design URL, waits for the preview iframe to
    /// show up and extracts the embedded design from the rendered page.
    pub fn fetch_design(&self, url: &Url) -> Result<DesignPage> {
        let tab = self.url_to_tab(url.as_str())?;
        tracing::info!("page loaded, waiting for the preview iframe");

        tab.wait_for_element("iframe[srcdoc]")?;
        let content = tab.get_content()?;

        Ok(DesignPage::from_preview(url, &content)?)
    }
}
