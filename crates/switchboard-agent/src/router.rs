use std::sync::Arc;

use switchboard_persist::{PersistError, PersistenceClient, Thread};
use switchboard_types::Binding;
use tracing::{debug, info, warn};

use crate::error::{ChatError, Result};
use crate::extractor::{normalize_thread_name, PersonaExtractor};
use crate::persona::{PersonaCatalog, DEFAULT_THREAD_NAME};

/// Input to one routing decision
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub user_id: &'a str,
    pub text: &'a str,
    /// Caller-supplied thread name; bypasses text inference
    pub explicit_thread_name: Option<&'a str>,
    /// Binding carried over from the previous turn of the same session
    pub current: Option<&'a Binding>,
}

impl<'a> RouteRequest<'a> {
    pub fn new(user_id: &'a str, text: &'a str) -> Self {
        Self {
            user_id,
            text,
            explicit_thread_name: None,
            current: None,
        }
    }

    pub fn thread_name(mut self, name: Option<&'a str>) -> Self {
        self.explicit_thread_name = name;
        self
    }

    pub fn current(mut self, binding: Option<&'a Binding>) -> Self {
        self.current = binding;
        self
    }
}

/// Which guard of the decision list matched, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTier {
    /// Named by the caller; found or created with the base prompt
    ExplicitName(String),
    /// Persona inferred from text; carries the raw extracted name
    Persona(String),
    /// No signal and nothing bound; most recent thread or `default`
    MostRecent,
    /// No signal and a thread already bound; stay there
    KeepCurrent(Binding),
}

/// Resolves each incoming message to a thread and its persona prompt
pub struct ThreadRouter {
    store: Arc<dyn PersistenceClient>,
    extractor: Arc<dyn PersonaExtractor>,
    catalog: PersonaCatalog,
}

impl ThreadRouter {
    pub fn new(
        store: Arc<dyn PersistenceClient>,
        extractor: Arc<dyn PersonaExtractor>,
        catalog: PersonaCatalog,
    ) -> Self {
        Self {
            store,
            extractor,
            catalog,
        }
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    /// Pick the tier for a request without touching storage
    pub fn decide(&self, request: &RouteRequest<'_>) -> RouteTier {
        if let Some(name) = request
            .explicit_thread_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            return RouteTier::ExplicitName(name.to_string());
        }

        if self.extractor.is_switch_intent(request.text) {
            debug!(user_id = %request.user_id, "Message reads as a switch request");
        }

        if let Some(persona) = self.extractor.extract(request.text) {
            if !normalize_thread_name(&persona).is_empty() {
                return RouteTier::Persona(persona);
            }
        }

        match request.current.filter(|b| !b.thread_id.is_empty()) {
            Some(binding) => RouteTier::KeepCurrent(binding.clone()),
            None => RouteTier::MostRecent,
        }
    }

    /// Resolve the binding for a request, creating the thread if needed
    ///
    /// A thread that does not exist yet is not an error here; it is created.
    /// A carried binding is honored only while its thread still exists and
    /// belongs to the requesting user. Storage failures propagate.
    pub async fn route(&self, request: RouteRequest<'_>) -> Result<Binding> {
        let tier = self.decide(&request);
        debug!(user_id = %request.user_id, tier = ?tier, "Routing decision");

        let user_id = request.user_id;
        let thread = match tier {
            RouteTier::ExplicitName(name) => {
                self.find_or_create(user_id, &name, self.catalog.base_prompt())
                    .await?
                    .0
            }
            RouteTier::Persona(persona) => {
                let thread_name = normalize_thread_name(&persona);
                let prompt = self.catalog.resolve_prompt(&persona, None);
                let (thread, created) =
                    self.find_or_create(user_id, &thread_name, &prompt).await?;
                if !created {
                    info!(
                        user_id = %user_id,
                        thread_id = %thread.id,
                        thread_name = %thread.thread_name,
                        "Switched to existing persona thread"
                    );
                }
                thread
            }
            RouteTier::MostRecent => self.most_recent_or_default(user_id).await?,
            RouteTier::KeepCurrent(binding) => {
                match self.store.get_thread(&binding.thread_id).await? {
                    Some(thread) if thread.user_id == user_id => thread,
                    Some(_) => {
                        warn!(
                            user_id = %user_id,
                            thread_id = %binding.thread_id,
                            "Carried binding belongs to another user, re-routing"
                        );
                        self.most_recent_or_default(user_id).await?
                    }
                    None => {
                        debug!(
                            user_id = %user_id,
                            thread_id = %binding.thread_id,
                            "Carried binding points at a missing thread, re-routing"
                        );
                        self.most_recent_or_default(user_id).await?
                    }
                }
            }
        };

        Ok(binding_for(&thread))
    }

    async fn most_recent_or_default(&self, user_id: &str) -> Result<Thread> {
        match self.store.most_recent_thread(user_id).await? {
            Some(thread) => Ok(thread),
            None => Ok(self
                .find_or_create(user_id, DEFAULT_THREAD_NAME, self.catalog.base_prompt())
                .await?
                .0),
        }
    }

    /// Look up `(user_id, name)` and create it when absent. Losing a creation
    /// race to another request re-reads the winner's thread. The flag is true
    /// only when this call inserted the thread.
    async fn find_or_create(
        &self,
        user_id: &str,
        name: &str,
        prompt: &str,
    ) -> Result<(Thread, bool)> {
        if let Some(thread) = self.store.find_thread(user_id, name).await? {
            return Ok((thread, false));
        }

        match self.store.create_thread(user_id, name, prompt).await {
            Ok(thread) => {
                info!(
                    user_id = %user_id,
                    thread_id = %thread.id,
                    thread_name = %thread.thread_name,
                    "Created thread"
                );
                Ok((thread, true))
            }
            Err(PersistError::DuplicateThread { .. }) => {
                debug!(user_id = %user_id, thread_name = %name, "Lost creation race, re-reading");
                let thread = self.store.find_thread(user_id, name).await?.ok_or_else(|| {
                    ChatError::from(PersistError::Internal(format!(
                        "Thread '{}' reported as duplicate but not found",
                        name
                    )))
                })?;
                Ok((thread, false))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn binding_for(thread: &Thread) -> Binding {
    Binding::new(&thread.id, &thread.thread_name, &thread.persona_prompt)
}
