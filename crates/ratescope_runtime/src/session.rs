//! Session state for the REPL.
//!
//! A [`Session`] wraps the [`LookupEngine`] with everything that depends on
//! who is looking: authentication, the subscription tier, the tier override,
//! usage sampling for the selected rule, the suggestion box, and the copy
//! indicator. Time only moves through [`Session::advance`], which fires due
//! timers against a virtual clock.

use chrono::{Local, NaiveDateTime};
use ratescope_debug::{TraceEvent, Tracer};
use ratescope_engine::{LookupEngine, Update};
use ratescope_foundation::{Dimension, Error, ErrorKind, Result, RuleId};
use ratescope_storage::RuleStore;

use crate::auth::{Authenticator, StaticTokenAuth};
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::RuntimeConfig;
use crate::sampler::{UsageSampler, UsageStatus};
use crate::scheduler::{Fired, Scheduler, Task};
use crate::suggest_box::{EnterAction, SuggestionBox};
use crate::tier::{FetchStatus, HttpTierService, TierService, TierTicket};

/// Interactive lookup session.
pub struct Session {
    config: RuntimeConfig,
    engine: LookupEngine,
    scheduler: Scheduler,
    sampler: UsageSampler,
    tracer: Tracer,
    suggestion_box: SuggestionBox,

    auth: Box<dyn Authenticator>,
    tiers: Box<dyn TierService>,
    clipboard: Box<dyn Clipboard>,

    /// Wall-clock time at virtual time zero.
    epoch: NaiveDateTime,

    manual_tier: Option<String>,
    fetched_tier: Option<String>,
    override_tier: bool,
    fetch_status: FetchStatus,
    fetch_message: Option<String>,
    /// Bumped on every login and logout; tier responses carry it.
    generation: u64,

    usage: UsageStatus,
    sampled: Option<RuleId>,
    copied: Option<RuleId>,
}

impl Session {
    /// Creates a session over `store` that fetches tiers over HTTP.
    ///
    /// The user starts anonymous.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(store: RuleStore, config: RuntimeConfig) -> Result<Self> {
        let tiers = HttpTierService::new(config.tier_url.clone())?;
        Self::with_services(
            store,
            config,
            Box::new(StaticTokenAuth::anonymous()),
            Box::new(tiers),
        )
    }

    /// Creates a session with explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_services(
        store: RuleStore,
        config: RuntimeConfig,
        auth: Box<dyn Authenticator>,
        tiers: Box<dyn TierService>,
    ) -> Result<Self> {
        config.validate()?;
        let sampler = UsageSampler::new(config.seed, config.fallback_limit)
            .with_reset_window(config.reset_window_secs);
        let tracer = Tracer::new(config.tracer.clone());

        Ok(Self {
            engine: LookupEngine::new(store),
            scheduler: Scheduler::new(),
            sampler,
            tracer,
            suggestion_box: SuggestionBox::new(),
            auth,
            tiers,
            clipboard: Box::new(MemoryClipboard::new()),
            epoch: Local::now().naive_local(),
            manual_tier: None,
            fetched_tier: None,
            override_tier: false,
            fetch_status: FetchStatus::Idle,
            fetch_message: None,
            generation: 0,
            usage: UsageStatus::Idle,
            sampled: None,
            copied: None,
            config,
        })
    }

    /// Replaces the clipboard.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Pins the wall-clock time of virtual time zero.
    #[must_use]
    pub fn with_epoch(mut self, epoch: NaiveDateTime) -> Self {
        self.epoch = epoch;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the lookup engine.
    #[must_use]
    pub fn engine(&self) -> &LookupEngine {
        &self.engine
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Returns the current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    /// Returns the timer queue.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns the tracer.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Returns a mutable reference to the tracer.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Returns the suggestion box state.
    #[must_use]
    pub fn suggestion_box(&self) -> SuggestionBox {
        self.suggestion_box
    }

    /// Returns the suggestions on screen; empty while the box is hidden.
    #[must_use]
    pub fn visible_suggestions(&self) -> &[String] {
        if self.suggestion_box.is_visible() {
            self.engine.suggestions()
        } else {
            &[]
        }
    }

    /// Returns true if the user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Returns true while the authenticator is busy.
    #[must_use]
    pub fn is_auth_loading(&self) -> bool {
        self.auth.is_loading()
    }

    /// Returns true if the tier override is on.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.override_tier
    }

    /// Returns the manually chosen tier.
    #[must_use]
    pub fn manual_tier(&self) -> Option<&str> {
        self.manual_tier.as_deref()
    }

    /// Returns the tier reported by the subscription service.
    #[must_use]
    pub fn fetched_tier(&self) -> Option<&str> {
        self.fetched_tier.as_deref()
    }

    /// Returns the tier that narrows the table.
    ///
    /// The manual tier wins while the override is on. Otherwise a logged-in
    /// user gets the fetched tier and an anonymous user the manual one.
    #[must_use]
    pub fn effective_tier(&self) -> Option<&str> {
        if self.override_tier || !self.auth.is_authenticated() {
            self.manual_tier.as_deref()
        } else {
            self.fetched_tier.as_deref()
        }
    }

    /// Returns true if the user may pick a tier by hand.
    #[must_use]
    pub fn can_choose_tier(&self) -> bool {
        self.override_tier || !self.auth.is_authenticated()
    }

    /// Returns the progress of the subscription lookup.
    #[must_use]
    pub fn fetch_status(&self) -> FetchStatus {
        self.fetch_status
    }

    /// Returns the last tier fetch failure message.
    #[must_use]
    pub fn fetch_message(&self) -> Option<&str> {
        self.fetch_message.as_deref()
    }

    /// Returns the authentication generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the usage panel state.
    #[must_use]
    pub fn usage(&self) -> &UsageStatus {
        &self.usage
    }

    /// Returns the rule being sampled.
    #[must_use]
    pub fn sampled_rule(&self) -> Option<RuleId> {
        self.sampled
    }

    /// Returns the rule whose path was just copied, while the indicator shows.
    #[must_use]
    pub fn copied(&self) -> Option<RuleId> {
        self.copied
    }

    /// Returns the wall-clock time at virtual time `at_ms`.
    #[must_use]
    pub fn wall_clock(&self, at_ms: u64) -> NaiveDateTime {
        let offset = i64::try_from(at_ms).unwrap_or(i64::MAX);
        self.epoch + chrono::Duration::milliseconds(offset)
    }

    // =========================================================================
    // Filters and Search
    // =========================================================================

    /// Selects a dropdown value, or clears it with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is not ready, the value is not
    /// offered, or a tier is chosen while the subscription decides it.
    pub fn select(&mut self, dimension: Dimension, value: Option<&str>) -> Result<Update> {
        match dimension {
            Dimension::Tier => self.select_tier(value),
            Dimension::Query => self.search(value.unwrap_or_default()),
            _ => {
                self.begin_step();
                let update = self.engine.select(dimension, value)?;
                self.tracer.filter_selected(dimension, value);
                self.after_update(Some(dimension), update);
                Ok(update)
            }
        }
    }

    /// Chooses the tier by hand.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::TierLocked`] while logged in without the
    /// override, or an error if the tier is not offered.
    pub fn select_tier(&mut self, tier: Option<&str>) -> Result<Update> {
        if !self.can_choose_tier() {
            return Err(Error::new(ErrorKind::TierLocked));
        }
        self.begin_step();
        let update = self.engine.select(Dimension::Tier, tier)?;
        self.manual_tier = tier.filter(|t| !t.is_empty()).map(str::to_string);
        self.suggestion_box.hide();
        self.tracer.filter_selected(Dimension::Tier, tier);
        self.after_update(Some(Dimension::Tier), update);
        Ok(update)
    }

    /// Replaces the search text.
    ///
    /// # Errors
    ///
    /// Returns an error if text is typed before a tier is set.
    pub fn search(&mut self, text: &str) -> Result<Update> {
        self.begin_step();
        let update = self.engine.set_query(text)?;
        self.suggestion_box.on_input();
        self.tracer
            .query_changed(text, self.engine.resolution().len());
        self.after_update(Some(Dimension::Query), update);
        Ok(update)
    }

    /// Clears the search text.
    ///
    /// # Errors
    ///
    /// Never fails in practice; empty text needs no tier.
    pub fn clear_search(&mut self) -> Result<Update> {
        self.search("")
    }

    // =========================================================================
    // Suggestion Box
    // =========================================================================

    /// The search box gained focus.
    pub fn focus(&mut self) {
        self.suggestion_box.on_focus();
    }

    /// The search box lost focus; the box hides after the blur delay.
    pub fn blur(&mut self) {
        self.scheduler
            .schedule(Task::SuggestionBlur, self.config.blur_delay_ms);
    }

    /// The pointer entered suggestion `index`.
    pub fn hover(&mut self, index: usize) {
        self.scheduler.cancel_task(Task::SuggestionBlur);
        let len = self.visible_suggestions().len();
        self.suggestion_box.hover(index, len);
    }

    /// Arrow down in the search box.
    pub fn key_down(&mut self) {
        let len = self.visible_suggestions().len();
        self.suggestion_box.move_down(len);
    }

    /// Arrow up in the search box.
    pub fn key_up(&mut self) {
        let len = self.visible_suggestions().len();
        self.suggestion_box.move_up(len);
    }

    /// Enter in the search box.
    ///
    /// Returns `None` if nothing was highlighted and the box was hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the pick fails.
    pub fn enter(&mut self) -> Result<Option<Update>> {
        let len = self.visible_suggestions().len();
        match self.suggestion_box.enter(len) {
            EnterAction::Pick(index) => self.pick_at(index).map(Some),
            EnterAction::Hide => Ok(None),
        }
    }

    /// Picks a suggested path.
    ///
    /// # Errors
    ///
    /// Returns an error if no tier is set.
    pub fn pick(&mut self, path: &str) -> Result<Update> {
        self.begin_step();
        let update = self.engine.pick_suggestion(path)?;
        self.finish_pick(update);
        Ok(update)
    }

    /// Picks the suggestion at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or no tier is set.
    pub fn pick_at(&mut self, index: usize) -> Result<Update> {
        self.begin_step();
        let update = self.engine.pick_suggestion_at(index)?;
        self.finish_pick(update);
        Ok(update)
    }

    fn finish_pick(&mut self, update: Update) {
        self.scheduler.cancel_task(Task::SuggestionBlur);
        self.suggestion_box.on_pick();
        let path = self.engine.filters().query().to_string();
        self.tracer
            .suggestion_picked(&path, self.engine.selected_id());
        self.after_update(None, update);
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Toggles a result card.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule is not among the results.
    pub fn click(&mut self, id: RuleId) -> Result<Update> {
        self.begin_step();
        let update = self.engine.click(id)?;
        self.after_update(None, update);
        Ok(update)
    }

    /// Copies a rule's path and shows the "copied" indicator.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule does not exist or the clipboard fails.
    pub fn copy(&mut self, id: RuleId) -> Result<String> {
        let path = self
            .engine
            .rule(id)
            .map(|stored| stored.path.clone())
            .ok_or_else(|| Error::rule_not_found(id))?;
        self.clipboard.copy(&path)?;
        self.copied = Some(id);
        self.scheduler
            .schedule(Task::CopyFeedback, self.config.copy_feedback_ms);
        Ok(path)
    }

    // =========================================================================
    // Authentication and Tier
    // =========================================================================

    /// Logs in and looks up the subscription tier.
    ///
    /// A failed lookup is not an error: the default tier applies and the
    /// status becomes [`FetchStatus::Error`].
    ///
    /// # Errors
    ///
    /// Returns an error if the authenticator refuses the login.
    pub fn login(&mut self) -> Result<FetchStatus> {
        self.begin_step();
        self.auth.login()?;
        self.generation += 1;
        self.tracer.record(TraceEvent::AuthChanged {
            authenticated: true,
        });
        tracing::info!(generation = self.generation, "logged in");
        self.full_reset();

        let ticket = self.begin_tier_fetch();
        let result = self
            .auth
            .token()
            .and_then(|token| self.tiers.fetch_tier(&token));
        self.complete_tier_fetch(ticket, result);
        Ok(self.fetch_status)
    }

    /// Logs out and forgets every tier choice.
    pub fn logout(&mut self) {
        self.begin_step();
        self.auth.logout();
        self.generation += 1;
        self.fetched_tier = None;
        self.manual_tier = None;
        self.override_tier = false;
        self.fetch_status = FetchStatus::Idle;
        self.fetch_message = None;
        self.tracer.record(TraceEvent::AuthChanged {
            authenticated: false,
        });
        tracing::info!(generation = self.generation, "logged out");
        self.full_reset();
    }

    /// Starts a tier lookup for the current login.
    pub fn begin_tier_fetch(&mut self) -> TierTicket {
        self.fetch_status = FetchStatus::Loading;
        self.fetch_message = None;
        self.tracer.record(TraceEvent::TierRequested {
            generation: self.generation,
        });
        TierTicket::new(self.generation)
    }

    /// Delivers a tier lookup result.
    ///
    /// Returns false, changing nothing, if the ticket belongs to an earlier
    /// login.
    pub fn complete_tier_fetch(&mut self, ticket: TierTicket, result: Result<String>) -> bool {
        if ticket.generation() != self.generation {
            tracing::debug!(
                ticket = ticket.generation(),
                current = self.generation,
                "stale tier response ignored"
            );
            self.tracer.record(TraceEvent::TierFetchIgnored {
                generation: ticket.generation(),
            });
            return false;
        }

        let success = result.is_ok();
        let tier = match result {
            Ok(tier) => {
                tracing::info!(%tier, "subscription tier fetched");
                self.fetch_status = FetchStatus::Success;
                self.fetch_message = None;
                tier
            }
            Err(err) => {
                tracing::warn!(error = %err, fallback = %self.config.default_tier, "tier fetch failed");
                self.fetch_status = FetchStatus::Error;
                self.fetch_message = Some(err.to_string());
                self.config.default_tier.clone()
            }
        };

        self.tracer.record(TraceEvent::TierFetched {
            tier: tier.clone(),
            success,
            message: self.fetch_message.clone(),
        });
        self.fetched_tier = Some(tier);
        self.sync_tier();
        true
    }

    /// Turns the tier override on or off.
    ///
    /// Turning it off drops the manual tier and every narrower filter.
    pub fn set_override(&mut self, on: bool) {
        if on == self.override_tier {
            return;
        }
        self.begin_step();
        self.override_tier = on;
        tracing::info!(on, "tier override changed");
        if on {
            self.sync_tier();
        } else {
            self.manual_tier = None;
            self.apply_effective_tier();
        }
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Moves virtual time forward by `ms`, firing every timer that comes due.
    ///
    /// Returns the timers that fired, in order.
    pub fn advance(&mut self, ms: u64) -> Vec<Fired> {
        let target = self.scheduler.now().saturating_add(ms);
        let mut fired = Vec::new();
        while let Some(timer) = self.scheduler.pop_due(target) {
            self.tracer.set_clock(timer.at_ms);
            self.on_timer(timer);
            fired.push(timer);
        }
        self.scheduler.advance_to(target);
        self.tracer.set_clock(target);
        fired
    }

    fn on_timer(&mut self, timer: Fired) {
        match timer.handle.task() {
            Task::UsageDelay | Task::UsagePoll => self.take_sample(timer.at_ms),
            Task::SuggestionBlur => self.suggestion_box.on_blur_elapsed(),
            Task::CopyFeedback => self.copied = None,
        }
    }

    fn take_sample(&mut self, at_ms: u64) {
        let Some(id) = self.sampled else {
            return;
        };
        let at = self.wall_clock(at_ms);
        let Some(stored) = self.engine.rule(id) else {
            return;
        };
        let sample = self.sampler.sample(stored.rule(), at);
        self.tracer.record(TraceEvent::UsageSampled {
            rule: id,
            usage: sample.current_usage,
            limit: sample.limit,
        });
        self.usage = UsageStatus::Ready(sample);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn begin_step(&mut self) {
        self.tracer.begin_step();
        self.tracer.set_clock(self.scheduler.now());
    }

    /// Records what an engine operation did and follows the selection with
    /// the sampler.
    fn after_update(&mut self, trigger: Option<Dimension>, update: Update) {
        if let Some(trigger) = trigger {
            self.tracer
                .cascade_reset(trigger, update.cleared.dimensions());
        }
        if let Some(change) = update.selection {
            self.tracer.selection_changed(change);
        }
        self.sync_sampling();
    }

    /// Clears every filter and the selection, then reapplies the tier.
    fn full_reset(&mut self) {
        let update = self.engine.reset();
        self.suggestion_box.hide();
        self.after_update(None, update);
        self.sync_tier();
    }

    /// Pushes the effective tier into the engine if it differs.
    fn sync_tier(&mut self) {
        if self.effective_tier() != self.engine.filters().tier() {
            self.apply_effective_tier();
        }
    }

    fn apply_effective_tier(&mut self) {
        let tier = self.effective_tier().map(str::to_string);
        let update = self.engine.apply_tier(tier.as_deref());
        self.suggestion_box.hide();
        self.tracer.filter_selected(Dimension::Tier, tier.as_deref());
        self.after_update(Some(Dimension::Tier), update);
    }

    /// Starts or stops sampling so it follows the selected rule.
    fn sync_sampling(&mut self) {
        let wanted = if self.auth.is_authenticated() {
            self.engine.selected_id()
        } else {
            None
        };
        if wanted == self.sampled {
            return;
        }

        if let Some(previous) = self.sampled.take() {
            self.scheduler.cancel_task(Task::UsageDelay);
            self.scheduler.cancel_task(Task::UsagePoll);
            self.usage = UsageStatus::Idle;
            self.tracer
                .record(TraceEvent::SamplingStopped { rule: previous });
        }

        if let Some(id) = wanted {
            let limit = self
                .engine
                .rule(id)
                .map_or(self.config.fallback_limit, |stored| {
                    self.sampler.limit_for(stored.rule())
                });
            self.scheduler
                .schedule(Task::UsageDelay, self.config.initial_delay_ms);
            self.scheduler.schedule_every(
                Task::UsagePoll,
                self.config.poll_interval_ms,
                self.config.poll_interval_ms,
            );
            self.usage = UsageStatus::Loading;
            self.sampled = Some(id);
            self.tracer
                .record(TraceEvent::SamplingStarted { rule: id, limit });
            tracing::debug!(rule = %id, limit, "sampling started");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("filters", self.engine.filters())
            .field("selected", &self.engine.selected_id())
            .field("authenticated", &self.auth.is_authenticated())
            .field("effective_tier", &self.effective_tier())
            .field("fetch_status", &self.fetch_status)
            .field("now_ms", &self.scheduler.now())
            .finish_non_exhaustive()
    }
}
