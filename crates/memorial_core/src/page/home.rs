//! Landing view: countdown, memory wall and the "add memory" form.

use crate::carousel::CarouselController;
use crate::catalog::MemoryCatalog;
use crate::config::SiteConfig;
use crate::countdown::{Clock, CountdownEngine, CountdownState, CountdownTicker};
use crate::form::SubmissionForm;
use crate::scope::{DocumentShell, ViewConfig, ViewGuard};
use log::info;
use std::sync::Arc;
use tokio::sync::watch;

pub const HOME_VIEW: &str = "home";
pub const HOME_DESCRIPTION: &str = "Memorial de memórias e momentos especiais de Kelwin & Isabela";

pub struct HomePage {
    countdown: CountdownTicker,
    carousel: CarouselController,
    form: SubmissionForm,
    view: ViewGuard,
}

impl HomePage {
    /// Enters the view. Must be called from within a tokio runtime.
    pub fn enter(
        shell: &DocumentShell,
        catalog: Arc<MemoryCatalog>,
        config: &SiteConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let view = shell.enter_view(ViewConfig {
            view: HOME_VIEW,
            dark_mode: true,
            meta_description: Some(HOME_DESCRIPTION.to_string()),
        });
        let countdown = CountdownTicker::start(CountdownEngine::new(config.target_instant, clock));
        info!(
            "event=page_enter module=page view={HOME_VIEW} memories={}",
            catalog.len()
        );

        Self {
            countdown,
            carousel: CarouselController::new(catalog),
            form: SubmissionForm::new(config.clone()),
            view,
        }
    }

    pub fn countdown(&self) -> CountdownState {
        self.countdown.current()
    }

    pub fn subscribe_countdown(&self) -> watch::Receiver<CountdownState> {
        self.countdown.subscribe()
    }

    pub fn is_countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut CarouselController {
        &mut self.carousel
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SubmissionForm {
        &mut self.form
    }

    /// Consumes and drops the page, which aborts the ticker and reverts the
    /// document changes.
    pub fn leave(self) {
        info!("event=page_leave module=page view={}", self.view.view());
    }
}

#[cfg(test)]
mod tests {
    use super::{HomePage, HOME_DESCRIPTION};
    use crate::catalog::MemoryCatalog;
    use crate::config::SiteConfig;
    use crate::countdown::ManualClock;
    use crate::scope::{DocumentShell, DARK_MODE_CLASS, META_DESCRIPTION};
    use chrono::Duration as ChronoDuration;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn enter_and_leave_scope_the_document() {
        let shell = DocumentShell::new();
        let config = SiteConfig::default();
        let clock = Arc::new(ManualClock::new(
            config.target_instant - ChronoDuration::seconds(90_061),
        ));
        let catalog = MemoryCatalog::builtin().expect("builtin catalog");

        let page = HomePage::enter(&shell, catalog, &config, clock);
        assert!(shell.has_root_class(DARK_MODE_CLASS));
        assert_eq!(
            shell.meta_content(META_DESCRIPTION).as_deref(),
            Some(HOME_DESCRIPTION)
        );
        let countdown = page.countdown();
        assert_eq!(
            (countdown.days, countdown.hours, countdown.minutes, countdown.seconds),
            (1, 1, 1, 1)
        );
        assert_eq!(page.carousel().index(), 0);
        assert!(page.form().is_pristine());

        page.leave();
        assert!(!shell.has_root_class(DARK_MODE_CLASS));
        assert_eq!(shell.meta_tag_count(), 0);
    }
}
