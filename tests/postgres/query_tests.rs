//! Sorting, search, and due-today join tests for the `PostgreSQL` store.

use crate::postgres::helpers::{PreparedStore, clock, prepared_store, project, task};
use crate::test_helpers::{TestClock, at};
use chrono::TimeDelta;
use mockable::Clock;
use rstest::rstest;
use taskboard::planning::{
    domain::{DayWindow, Project, ProjectDateField, ProjectFields, Task, TaskStatus},
    ports::{ProjectRepository, TaskRepository},
};

/// Collects names in sorted order for comparisons that ignore tie order.
fn sorted_names<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut names: Vec<&str> = items.into_iter().collect();
    names.sort_unstable();
    names
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server named by TASKBOARD_TEST_DATABASE_URL"]
async fn sorted_projects_put_missing_dates_first(
    #[future] prepared_store: eyre::Result<PreparedStore>,
    clock: TestClock,
) -> eyre::Result<()> {
    let context = prepared_store.await?;
    let late = project("Late", Some(at(2024, 5, 1, 0, 0)), &clock);
    let undated = project("Undated", None, &clock);
    let early = project("Early", Some(at(2024, 1, 1, 0, 0)), &clock);
    for each in [&late, &undated, &early] {
        context.store.store_project(each).await?;
    }

    let sorted = context
        .store
        .list_projects_sorted(ProjectDateField::StartDate)
        .await?;

    let order: Vec<&str> = sorted.iter().map(Project::name).collect();
    eyre::ensure!(
        order == ["Undated", "Early", "Late"],
        "unexpected order {order:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server named by TASKBOARD_TEST_DATABASE_URL"]
async fn search_is_case_insensitive_and_literal(
    #[future] prepared_store: eyre::Result<PreparedStore>,
    clock: TestClock,
) -> eyre::Result<()> {
    let context = prepared_store.await?;
    for name in ["Write 100% Report", "Write 100 Reports", "Review"] {
        let each = task(name, TaskStatus::ToDo, TimeDelta::days(1), None, &clock);
        context.store.store_task(&each).await?;
    }

    let percent = context.store.search_tasks_by_name("100%").await?;
    let report = context.store.search_tasks_by_name("REPORT").await?;

    let percent_names = sorted_names(percent.iter().map(Task::name));
    let report_names = sorted_names(report.iter().map(Task::name));
    eyre::ensure!(
        percent_names == ["Write 100% Report"],
        "wildcards must match literally, got {percent_names:?}"
    );
    eyre::ensure!(
        report_names == ["Write 100 Reports", "Write 100% Report"],
        "search must ignore case, got {report_names:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server named by TASKBOARD_TEST_DATABASE_URL"]
async fn status_filter_returns_matching_tasks(
    #[future] prepared_store: eyre::Result<PreparedStore>,
    clock: TestClock,
) -> eyre::Result<()> {
    let context = prepared_store.await?;
    let open = task("Open", TaskStatus::ToDo, TimeDelta::days(1), None, &clock);
    let closed = task("Closed", TaskStatus::Done, TimeDelta::days(1), None, &clock);
    context.store.store_task(&open).await?;
    context.store.store_task(&closed).await?;

    let done = context.store.find_tasks_by_status(TaskStatus::Done).await?;

    eyre::ensure!(done == vec![closed], "unexpected done tasks {done:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server named by TASKBOARD_TEST_DATABASE_URL"]
async fn projects_with_tasks_due_today_carry_every_task(
    #[future] prepared_store: eyre::Result<PreparedStore>,
    clock: TestClock,
) -> eyre::Result<()> {
    let context = prepared_store.await?;
    let alpha = project("Alpha", None, &clock);
    let beta = project("Beta", None, &clock);
    context.store.store_project(&alpha).await?;
    context.store.store_project(&beta).await?;
    let due = task("Due", TaskStatus::ToDo, TimeDelta::zero(), Some(alpha.id()), &clock);
    let later = task("Later", TaskStatus::ToDo, TimeDelta::days(4), Some(alpha.id()), &clock);
    let other = task("Other", TaskStatus::ToDo, TimeDelta::days(4), Some(beta.id()), &clock);
    for each in [&due, &later, &other] {
        context.store.store_task(each).await?;
    }

    let grouped = context
        .store
        .projects_with_tasks_due(DayWindow::today(&clock))
        .await?;

    eyre::ensure!(grouped.len() == 1, "only Alpha has a task due today");
    let entry = grouped
        .first()
        .ok_or_else(|| eyre::eyre!("expected one project"))?;
    eyre::ensure!(entry.project == alpha, "wrong project {:?}", entry.project);
    let task_names = sorted_names(entry.tasks.iter().map(Task::name));
    eyre::ensure!(task_names == ["Due", "Later"], "unexpected tasks {task_names:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server named by TASKBOARD_TEST_DATABASE_URL"]
async fn tasks_with_project_due_today_embed_the_project(
    #[future] prepared_store: eyre::Result<PreparedStore>,
    clock: TestClock,
) -> eyre::Result<()> {
    let context = prepared_store.await?;
    let due_today = clock.utc();
    let mut alpha = project("Alpha", None, &clock);
    alpha.replace(
        ProjectFields {
            name: "Alpha".to_owned(),
            description: None,
            start_date: None,
            due_date: Some(due_today),
        },
        &clock,
    );
    let beta = project("Beta", None, &clock);
    context.store.store_project(&alpha).await?;
    context.store.store_project(&beta).await?;
    let inside = task("Inside", TaskStatus::ToDo, TimeDelta::days(9), Some(alpha.id()), &clock);
    let outside = task("Outside", TaskStatus::ToDo, TimeDelta::days(9), Some(beta.id()), &clock);
    context.store.store_task(&inside).await?;
    context.store.store_task(&outside).await?;

    let joined = context
        .store
        .tasks_with_project_due(DayWindow::today(&clock))
        .await?;

    eyre::ensure!(joined.len() == 1, "only Inside belongs to a project due today");
    let entry = joined
        .first()
        .ok_or_else(|| eyre::eyre!("expected one task"))?;
    eyre::ensure!(entry.task == inside, "wrong task {:?}", entry.task);
    eyre::ensure!(entry.project == alpha, "wrong project {:?}", entry.project);
    Ok(())
}
