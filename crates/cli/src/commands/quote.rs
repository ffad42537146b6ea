//! Commands that need the signed-in user.

#![allow(clippy::print_stdout)]

use cotizapro_core::QuoteId;
use cotizapro_engine::EngineError;

use super::Context;

/// Greet the signed-in user.
pub async fn whoami(ctx: &Context) -> Result<(), EngineError> {
    let identity = ctx.identity().await?;
    println!("Hola, {}", identity.display_name);
    Ok(())
}

/// Commit the local draft for the signed-in user.
pub async fn commit(ctx: &Context) -> Result<(), EngineError> {
    let identity = ctx.identity().await?;
    let mut session = ctx.session()?;

    let id = session.commit(&identity.owner_id).await?;

    println!("Cotización guardada: {id}");
    println!("{}", ctx.reader()?.share_url(&id));
    Ok(())
}

/// Render a saved quote.
pub async fn show(ctx: &Context, id: &str) -> Result<(), EngineError> {
    let identity = ctx.identity().await?;
    let reader = ctx.reader()?;

    let quote = reader.fetch(&QuoteId::new(id), &identity.owner_id).await?;
    let view = reader.present(&quote);

    println!("Cotización {}", view.id);
    println!("Fecha: {}", view.date);
    println!("Cliente: {}", view.customer_name);
    if let Some(phone) = &view.customer_phone {
        println!("Teléfono: {phone}");
    }
    println!();
    for row in &view.rows {
        println!(
            "{:>3}. {}  {} = {}",
            row.position, row.description, row.detail, row.amount
        );
    }
    println!();
    println!("Subtotal:  {}", view.subtotal);
    println!("IVA (16%): {}", view.tax);
    println!("Total:     {}", view.total);
    Ok(())
}

/// Print the share summary of a saved quote.
pub async fn share(ctx: &Context, id: &str) -> Result<(), EngineError> {
    let identity = ctx.identity().await?;
    let reader = ctx.reader()?;

    let quote = reader.fetch(&QuoteId::new(id), &identity.owner_id).await?;
    println!("{}", reader.format_summary(&quote));
    Ok(())
}
