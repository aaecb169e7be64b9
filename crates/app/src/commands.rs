use engine::{
    Backend, Budget, BudgetInput, Category, CategoryInput, CategoryUpdate, Engine, SavingsGoal,
    SavingsGoalInput, Transaction, TransactionInput,
};

use crate::{
    cli::{
        BudgetArgs, BudgetCommand, CategoryCommand, Command, GoalArgs, GoalCommand,
        TransactionArgs, TransactionCommand,
    },
    error::{AppError, Result},
};

pub async fn run<B: Backend>(engine: &Engine<B>, command: Command) -> Result<()> {
    match command {
        Command::Transactions(command) => transactions(engine, command).await,
        Command::Budgets(command) => budgets(engine, command).await,
        Command::Categories(command) => categories(engine, command).await,
        Command::Goals(command) => goals(engine, command).await,
    }
}

fn not_found(what: &str, id: i64) -> AppError {
    AppError::InvalidInput(format!("{what} {id} not found"))
}

fn deleted(what: &str, id: i64, removed: bool) {
    if removed {
        println!("deleted {what} {id}");
    } else {
        println!("{what} {id} was not deleted");
    }
}

async fn transactions<B: Backend>(engine: &Engine<B>, command: TransactionCommand) -> Result<()> {
    match command {
        TransactionCommand::List { month, category } => {
            let rows = match (month, category) {
                (Some(month), _) => engine.transactions_by_month(month).await,
                (None, Some(category)) => engine.transactions_by_category(&category).await,
                (None, None) => engine.transactions().await,
            };
            rows.iter().for_each(|t| println!("{}", transaction_line(t)));
        }
        TransactionCommand::Show { id } => {
            let t = engine
                .transaction(id)
                .await
                .ok_or_else(|| not_found("transaction", id))?;
            println!("{}", transaction_line(&t));
        }
        TransactionCommand::Add(fields) => {
            let t = engine.create_transaction(&transaction_input(fields)).await?;
            println!("created {}", transaction_line(&t));
        }
        TransactionCommand::Edit { id, fields } => {
            let t = engine
                .update_transaction(id, &transaction_input(fields))
                .await?;
            println!("updated {}", transaction_line(&t));
        }
        TransactionCommand::Delete { id } => {
            deleted("transaction", id, engine.delete_transaction(id).await?);
        }
    }
    Ok(())
}

async fn budgets<B: Backend>(engine: &Engine<B>, command: BudgetCommand) -> Result<()> {
    match command {
        BudgetCommand::List { month, year } => {
            let rows = match (month, year) {
                (Some(month), Some(year)) => engine.budgets_for_period(month, year).await,
                (Some(month), None) => engine.budgets_by_month(month).await,
                _ => engine.budgets().await,
            };
            rows.iter().for_each(|b| println!("{}", budget_line(b)));
        }
        BudgetCommand::Show { id } => {
            let b = engine
                .budget(id)
                .await
                .ok_or_else(|| not_found("budget", id))?;
            println!("{}", budget_line(&b));
        }
        BudgetCommand::Set(fields) => {
            let b = engine
                .upsert_budget(&fields.category, fields.limit, fields.month, fields.year)
                .await?;
            println!("saved {}", budget_line(&b));
        }
        BudgetCommand::Edit { id, fields } => {
            let b = engine.update_budget(id, &budget_input(fields)).await?;
            println!("updated {}", budget_line(&b));
        }
        BudgetCommand::Delete { id } => {
            deleted("budget", id, engine.delete_budget(id).await?);
        }
    }
    Ok(())
}

async fn categories<B: Backend>(engine: &Engine<B>, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::List { kind } => {
            let rows = match kind {
                Some(kind) => engine.categories_by_kind(kind).await,
                None => engine.categories().await,
            };
            rows.iter().for_each(|c| println!("{}", category_line(c)));
        }
        CategoryCommand::Show { id } => {
            let c = engine
                .category(id)
                .await
                .ok_or_else(|| not_found("category", id))?;
            println!("{}", category_line(&c));
        }
        CategoryCommand::Add { name, kind } => {
            let c = engine
                .create_category(&CategoryInput { name, kind })
                .await?;
            println!("created {}", category_line(&c));
        }
        CategoryCommand::Edit {
            id,
            name,
            kind,
            built_in,
        } => {
            let update = CategoryUpdate {
                name,
                kind,
                is_custom: !built_in,
            };
            let c = engine.update_category(id, &update).await?;
            println!("updated {}", category_line(&c));
        }
        CategoryCommand::Delete { id } => {
            deleted("category", id, engine.delete_category(id).await?);
        }
    }
    Ok(())
}

async fn goals<B: Backend>(engine: &Engine<B>, command: GoalCommand) -> Result<()> {
    match command {
        GoalCommand::List => {
            for g in engine.savings_goals().await {
                println!("{}", goal_line(&g));
            }
        }
        GoalCommand::Show { id } => {
            let g = engine
                .savings_goal(id)
                .await
                .ok_or_else(|| not_found("savings goal", id))?;
            println!("{}", goal_line(&g));
        }
        GoalCommand::Add(fields) => {
            let g = engine.create_savings_goal(&goal_input(fields)).await?;
            println!("created {}", goal_line(&g));
        }
        GoalCommand::Edit { id, fields } => {
            let g = engine.update_savings_goal(id, &goal_input(fields)).await?;
            println!("updated {}", goal_line(&g));
        }
        GoalCommand::Adjust { id, delta } => {
            let g = engine.update_goal_amount(id, delta).await?;
            println!("adjusted {}", goal_line(&g));
        }
        GoalCommand::Delete { id } => {
            deleted("savings goal", id, engine.delete_savings_goal(id).await?);
        }
    }
    Ok(())
}

fn transaction_input(args: TransactionArgs) -> TransactionInput {
    TransactionInput {
        description: args.description,
        amount: args.amount,
        category: args.category,
        kind: args.kind,
        date: args.date,
    }
}

fn budget_input(args: BudgetArgs) -> BudgetInput {
    BudgetInput {
        category: args.category,
        monthly_limit: args.limit,
        month: args.month,
        year: args.year,
    }
}

fn goal_input(args: GoalArgs) -> SavingsGoalInput {
    SavingsGoalInput {
        title: args.title,
        target_amount: args.target,
        current_amount: args.current,
        deadline: args.deadline,
    }
}

fn transaction_line(t: &Transaction) -> String {
    format!(
        "#{} {} {:>10} {:<7} {} ({})",
        t.id,
        t.date,
        t.amount.to_string(),
        t.kind.as_str(),
        t.description,
        t.category
    )
}

fn budget_line(b: &Budget) -> String {
    format!(
        "#{} {}-{:02} {} limit {}",
        b.id, b.year, b.month, b.category, b.monthly_limit
    )
}

fn category_line(c: &Category) -> String {
    let origin = if c.is_custom { "custom" } else { "built-in" };
    format!("#{} {} [{}, {origin}]", c.id, c.name, c.kind)
}

fn goal_line(g: &SavingsGoal) -> String {
    format!(
        "#{} {} {}/{} ({}%, {} to go) due {}",
        g.id,
        g.title,
        g.current_amount,
        g.target_amount,
        g.progress_percent(),
        g.remaining(),
        g.deadline
    )
}
