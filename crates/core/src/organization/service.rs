//! Folder and list taxonomy: inspection and idempotent set-up

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};
use verdant_common::{Clock, SystemClock};
use verdant_domain::constants::{LIST_PAGE_SIZE, NO_FOLDER_LABEL};
use verdant_domain::{
    ContactList, ListPlacement, NewList, OrganizationReport, OrganizationSummary, SetupConfig,
    SetupListEntry, SetupReport, TaxonomyFolder,
};

use crate::marketing::{EmailMarketingProvider, ProviderResult};

/// Cooperative delays between bulk calls
///
/// Applied on top of the per-call rate limiter to keep bulk set-up gentle on
/// the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacing {
    /// Sleep after each created folder.
    pub between_folders: Duration,
    /// Sleep after each created list.
    pub between_lists: Duration,
}

impl Pacing {
    /// No pauses.
    pub fn none() -> Self {
        Self::default()
    }
}

impl From<SetupConfig> for Pacing {
    fn from(config: SetupConfig) -> Self {
        Self {
            between_folders: Duration::from_millis(config.folder_pacing_ms),
            between_lists: Duration::from_millis(config.list_pacing_ms),
        }
    }
}

/// Audits and creates the folder and list taxonomy in the provider account.
pub struct OrganizationService<C: Clock = SystemClock> {
    provider: Arc<dyn EmailMarketingProvider>,
    pacing: Pacing,
    clock: C,
}

impl OrganizationService<SystemClock> {
    /// Service without pacing between creations.
    pub fn new(provider: Arc<dyn EmailMarketingProvider>) -> Self {
        Self::with_clock(provider, SystemClock)
    }
}

impl<C: Clock> OrganizationService<C> {
    /// Service whose pacing sleeps go through `clock`.
    pub fn with_clock(provider: Arc<dyn EmailMarketingProvider>, clock: C) -> Self {
        Self { provider, pacing: Pacing::none(), clock }
    }

    /// Pause between created folders and lists.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            self.clock.sleep(duration).await;
        }
    }

    /// Report every list with the name of its folder, grouped by folder.
    #[instrument(skip(self))]
    pub async fn check_organization(&self) -> ProviderResult<OrganizationReport> {
        let folders = self.provider.get_folders().await?.folders;
        let lists = self.all_lists().await?;
        info!(folders = folders.len(), lists = lists.len(), "organization fetched");

        let names: BTreeMap<i64, &str> = folders.iter().map(|f| (f.id, f.name.as_str())).collect();

        let placements: Vec<ListPlacement> = lists
            .iter()
            .map(|list| ListPlacement {
                id: list.id,
                name: list.name.clone(),
                folder: list
                    .folder_id
                    .and_then(|id| names.get(&id).copied())
                    .unwrap_or(NO_FOLDER_LABEL)
                    .to_string(),
                folder_id: list.folder_id,
                contacts: list.subscribers(),
            })
            .collect();

        let mut organized: BTreeMap<String, Vec<ListPlacement>> = BTreeMap::new();
        for placement in &placements {
            organized.entry(placement.folder.clone()).or_default().push(placement.clone());
        }

        let summary = OrganizationSummary {
            total_folders: folders.len(),
            total_lists: placements.len(),
            lists_without_folder: placements.iter().filter(|p| p.folder == NO_FOLDER_LABEL).count(),
        };

        Ok(OrganizationReport { folders, lists: placements, organized, summary })
    }

    async fn all_lists(&self) -> ProviderResult<Vec<ContactList>> {
        let mut lists = Vec::new();
        loop {
            let offset = u32::try_from(lists.len()).unwrap_or(u32::MAX);
            let page = self.provider.get_lists(LIST_PAGE_SIZE, offset).await?;
            let fetched = page.lists.len();
            lists.extend(page.lists);
            if fetched == 0 || lists.len() as u64 >= page.count {
                return Ok(lists);
            }
        }
    }

    /// Make sure every folder of `taxonomy` and every list in it exists.
    ///
    /// Per-item failures are logged and recorded; the run continues. Lists
    /// whose folder could not be resolved are skipped.
    #[instrument(skip(self, taxonomy), fields(folders = taxonomy.len()))]
    pub async fn setup_organization(&self, taxonomy: &[TaxonomyFolder]) -> SetupReport {
        let mut report = SetupReport::default();

        for (i, folder) in taxonomy.iter().enumerate() {
            if i > 0 {
                self.pause(self.pacing.between_folders).await;
            }
            self.ensure_folder(&folder.name, &mut report).await;
        }

        let mut first = true;
        for folder in taxonomy {
            for list in &folder.lists {
                if !first {
                    self.pause(self.pacing.between_lists).await;
                }
                first = false;
                self.ensure_list(list, &folder.name, &mut report).await;
            }
        }

        info!(
            folders_created = report.folders_created,
            folders_reused = report.folders_reused,
            lists_created = report.lists_created,
            lists_existing = report.lists_existing,
            lists_skipped = report.lists_skipped,
            failures = report.failures.len(),
            "organization set-up finished"
        );
        report
    }

    async fn ensure_folder(&self, name: &str, report: &mut SetupReport) {
        match self.provider.create_folder(name).await {
            Ok(created) => {
                info!(folder = name, folder_id = created.id, "folder created");
                report.folders_created += 1;
                report.folders.insert(name.to_string(), created.id);
            }
            Err(err) if err.is_duplicate() => match self.existing_folder_id(name).await {
                Ok(Some(id)) => {
                    info!(folder = name, folder_id = id, "folder already exists");
                    report.folders_reused += 1;
                    report.folders.insert(name.to_string(), id);
                }
                Ok(None) => {
                    warn!(folder = name, "folder reported as duplicate but not listed");
                    report.failures.push(format!("Folder \"{name}\": reported as existing but not found"));
                }
                Err(lookup) => {
                    error!(folder = name, error = %lookup, "folder lookup failed");
                    report.failures.push(format!("Folder \"{name}\": {lookup}"));
                }
            },
            Err(err) => {
                error!(folder = name, error = %err, "failed to create folder");
                report.failures.push(format!("Folder \"{name}\": {err}"));
            }
        }
    }

    async fn existing_folder_id(&self, name: &str) -> ProviderResult<Option<i64>> {
        let wanted = name.to_lowercase();
        let page = self.provider.get_folders().await?;
        Ok(page.folders.iter().find(|f| f.name.to_lowercase() == wanted).map(|f| f.id))
    }

    async fn ensure_list(&self, name: &str, folder: &str, report: &mut SetupReport) {
        let Some(folder_id) = report.folders.get(folder).copied() else {
            warn!(list = name, folder, "skipping list, folder not resolved");
            report.lists_skipped += 1;
            return;
        };

        let request = NewList { name: name.to_string(), folder_id: Some(folder_id) };
        match self.provider.create_list(&request).await {
            Ok(created) => {
                info!(list = name, folder, list_id = created.id, "list created");
                report.lists_created += 1;
                report.lists.push(SetupListEntry {
                    name: name.to_string(),
                    id: created.id,
                    folder: folder.to_string(),
                });
            }
            Err(err) if err.is_duplicate() => {
                info!(list = name, "list already exists");
                report.lists_existing += 1;
            }
            Err(err) => {
                error!(list = name, error = %err, "failed to create list");
                report.failures.push(format!("List \"{name}\": {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use verdant_common::MockClock;
    use verdant_domain::ProviderError;

    use super::*;
    use crate::testing::{InMemoryProvider, Operation};

    fn taxonomy() -> Vec<TaxonomyFolder> {
        vec![
            TaxonomyFolder { name: "Lead Magnets".into(), lists: vec!["Quiz Completers".into()] },
            TaxonomyFolder {
                name: "Customers".into(),
                lists: vec!["Repeat Customers".into(), "VIP Customers".into()],
            },
        ]
    }

    #[tokio::test]
    async fn check_groups_lists_by_folder() {
        let provider = Arc::new(InMemoryProvider::new());
        let folder = provider.seed_folder("Lead Magnets");
        provider.seed_list("Quiz Completers", Some(folder));
        provider.seed_list("Orphans", None);
        provider.seed_list("Lost", Some(999));
        provider.seed_contact("a@example.com", "Quiz Completers");

        let report = OrganizationService::new(provider).check_organization().await.unwrap();

        assert_eq!(report.summary, OrganizationSummary { total_folders: 1, total_lists: 3, lists_without_folder: 2 });
        assert_eq!(report.organized["Lead Magnets"][0].name, "Quiz Completers");
        assert_eq!(report.organized["Lead Magnets"][0].contacts, 1);
        assert_eq!(report.organized[NO_FOLDER_LABEL].len(), 2);
    }

    #[tokio::test]
    async fn check_pages_through_every_list() {
        let provider = Arc::new(InMemoryProvider::new());
        for i in 0..75 {
            provider.seed_list(&format!("List {i}"), None);
        }

        let report = OrganizationService::new(provider.clone()).check_organization().await.unwrap();

        assert_eq!(report.summary.total_lists, 75);
        assert_eq!(provider.calls(Operation::GetLists), 2);
    }

    #[tokio::test]
    async fn setup_on_empty_account_creates_everything() {
        let provider = Arc::new(InMemoryProvider::new());
        let service = OrganizationService::new(provider.clone());

        let report = service.setup_organization(&taxonomy()).await;

        assert_eq!(report.folders_created, 2);
        assert_eq!(report.lists_created, 3);
        assert!(report.failures.is_empty());
        let customers = report.folders["Customers"];
        assert!(provider.lists().iter().filter(|l| l.folder_id == Some(customers)).count() == 2);
    }

    #[tokio::test]
    async fn setup_is_idempotent() {
        let provider = Arc::new(InMemoryProvider::new());
        let service = OrganizationService::new(provider.clone());

        service.setup_organization(&taxonomy()).await;
        let second = service.setup_organization(&taxonomy()).await;

        assert_eq!(second.folders_created, 0);
        assert_eq!(second.folders_reused, 2);
        assert_eq!(second.lists_created, 0);
        assert_eq!(second.lists_existing, 3);
        assert_eq!(provider.folders().len(), 2);
        assert_eq!(provider.lists().len(), 3);
    }

    #[tokio::test]
    async fn lists_of_unresolved_folders_are_skipped() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.fail_on(Operation::CreateFolder, ProviderError::api(500, r#"{"message":"boom"}"#));
        let service = OrganizationService::new(provider.clone());

        let report = service.setup_organization(&taxonomy()).await;

        assert_eq!(report.lists_skipped, 3);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(provider.calls(Operation::CreateList), 0);
    }

    #[tokio::test]
    async fn list_failures_do_not_stop_the_run() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.fail_on(Operation::CreateList, ProviderError::transport("connection reset"));
        let service = OrganizationService::new(provider.clone());

        let report = service.setup_organization(&taxonomy()).await;

        assert_eq!(report.folders_created, 2);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(provider.calls(Operation::CreateList), 3);
    }

    #[tokio::test]
    async fn pacing_sleeps_between_calls() {
        let provider = Arc::new(InMemoryProvider::new());
        let clock = MockClock::new();
        let service = OrganizationService::with_clock(provider, clock.clone())
            .with_pacing(Pacing::from(SetupConfig::default()));

        service.setup_organization(&taxonomy()).await;

        let sleeps = clock.sleeps();
        assert_eq!(sleeps.iter().filter(|d| **d == Duration::from_millis(500)).count(), 1);
        assert_eq!(sleeps.iter().filter(|d| **d == Duration::from_millis(300)).count(), 2);
    }

    #[tokio::test]
    async fn no_pacing_never_sleeps() {
        let provider = Arc::new(InMemoryProvider::new());
        let clock = MockClock::new();
        let service = OrganizationService::with_clock(provider, clock.clone());

        service.setup_organization(&taxonomy()).await;

        assert!(clock.sleeps().is_empty());
    }
}
