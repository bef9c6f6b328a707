//! History ordering and append-only enforcement in `PostgreSQL`.

use crate::postgres::helpers::{MANAGER, Store, reported, test_runtime};
use defectflow::defect::{domain::Defect, ports::DefectRepository};
use defectflow::history::{
    domain::{ActionType, HistoryEntry, HistoryEntryId, PersistedHistoryEntry},
    ports::{HistoryRepository, HistoryRepositoryError},
};
use diesel::prelude::*;
use eyre::{bail, ensure};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

/// Builds an entry stamped with the defect's creation time.
fn entry_at_report_time(defect: &Defect, text: &str) -> HistoryEntry {
    HistoryEntry::from_persisted(PersistedHistoryEntry {
        id: HistoryEntryId::new(),
        defect_id: defect.id(),
        actor_id: MANAGER,
        action_type: ActionType::Comment,
        action_text: text.to_owned(),
        created_at: defect.created_at(),
    })
}

#[rstest]
fn equal_timestamps_list_in_append_order(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let store = Store::open(shared_test_cluster, "history_order")?;
    let rt = test_runtime()?;
    let defect = reported("Leaking pipe")?;
    rt.block_on(store.defects.store(&defect))?;

    let texts = ["first", "second", "third", "fourth"];
    for text in texts {
        rt.block_on(store.history.append(&entry_at_report_time(&defect, text)))?;
    }

    let listed = rt.block_on(store.history.list_for(defect.id()))?;
    let listed_texts: Vec<&str> = listed.iter().map(HistoryEntry::action_text).collect();
    ensure!(listed_texts == texts, "got {listed_texts:?}");
    Ok(())
}

#[rstest]
fn stored_entries_cannot_be_rewritten(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let store = Store::open(shared_test_cluster, "history_append_only")?;
    let rt = test_runtime()?;
    let defect = reported("Leaking pipe")?;
    rt.block_on(store.defects.store(&defect))?;
    let entry = entry_at_report_time(&defect, "Checked on site");
    rt.block_on(store.history.append(&entry))?;

    let mut conn = store.database.connect()?;
    let updated =
        diesel::sql_query("UPDATE defect_history SET action_text = 'edited' WHERE id = $1")
            .bind::<diesel::sql_types::Uuid, _>(entry.id().into_inner())
            .execute(&mut conn);
    ensure!(updated.is_err(), "UPDATE on defect_history should be rejected");
    let deleted = diesel::sql_query("DELETE FROM defect_history WHERE id = $1")
        .bind::<diesel::sql_types::Uuid, _>(entry.id().into_inner())
        .execute(&mut conn);
    ensure!(deleted.is_err(), "DELETE on defect_history should be rejected");

    let listed = rt.block_on(store.history.list_for(defect.id()))?;
    let [kept] = listed.as_slice() else {
        bail!("expected the entry to survive, got {listed:?}");
    };
    ensure!(kept.id() == entry.id());
    ensure!(kept.action_text() == "Checked on site");
    Ok(())
}

#[rstest]
fn duplicate_entry_id_is_rejected(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let store = Store::open(shared_test_cluster, "history_duplicate")?;
    let rt = test_runtime()?;
    let defect = reported("Leaking pipe")?;
    rt.block_on(store.defects.store(&defect))?;
    let entry = entry_at_report_time(&defect, "Checked on site");
    rt.block_on(store.history.append(&entry))?;

    let result = rt.block_on(store.history.append(&entry));

    ensure!(
        matches!(result, Err(HistoryRepositoryError::DuplicateEntry(id)) if id == entry.id()),
        "expected DuplicateEntry, got {result:?}"
    );
    Ok(())
}
