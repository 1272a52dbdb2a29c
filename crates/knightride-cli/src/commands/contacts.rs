use anyhow::Result;
use knightride_application::ContactBook;
use knightride_core::contact::EmergencyContact;

use crate::context::AppContext;

fn book(ctx: &AppContext) -> ContactBook {
    ContactBook::new(ctx.client.clone())
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let contacts = book(ctx).list().await?;
    if contacts.is_empty() {
        println!("No emergency contacts");
        return Ok(());
    }

    for (index, contact) in contacts.iter().enumerate() {
        println!(
            "[{}] {} ({}) {}",
            index, contact.name, contact.relation, contact.phone
        );
    }
    Ok(())
}

pub async fn add(ctx: &AppContext, name: String, phone: String, relation: String) -> Result<()> {
    let added = book(ctx)
        .add(&EmergencyContact::new(name, phone, relation))
        .await?;
    println!("{}", added.message);
    Ok(())
}

pub async fn remove(ctx: &AppContext, index: usize) -> Result<()> {
    let deleted = book(ctx).remove_at(index).await?;
    print_deleted(&deleted);
    Ok(())
}

pub async fn remove_phone(ctx: &AppContext, phone: &str) -> Result<()> {
    let deleted = book(ctx).remove_matching(phone).await?;
    print_deleted(&deleted);
    Ok(())
}

fn print_deleted(deleted: &knightride_core::contact::ContactDeleted) {
    match &deleted.deleted_contact {
        Some(contact) => println!("{}: {} {}", deleted.message, contact.name, contact.phone),
        None => println!("{}", deleted.message),
    }
}
