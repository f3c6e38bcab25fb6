//! Pizzeria command line.

use std::collections::BTreeSet;
use std::process;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use jiff::{tz::TimeZone, Zoned};
use pizzeria::{
    catalog::ProductCatalog,
    checkout::CheckoutForm,
    clients::ActorClient,
    config::Settings,
    kitchen::{BoardFilter, BoardSnapshot},
    lifecycle::{setup_tracing, PizzeriaSystem},
    model::{Cart, CustomerDetails, Order, OrderId, OrderStatus, Priority, ProductId},
    pricing::Customization,
    service_area::{format_address, DeliveryEstimate, DeliveryHours, NextDelivery},
};
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};

#[derive(Debug, Parser)]
#[command(name = "pizzeria", about = "Pizzeria order store", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the menu
    Menu,
    /// Price one configured product
    Quote(QuoteArgs),
    /// Place an order
    Order(OrderArgs),
    /// List orders
    Orders(FilterArgs),
    /// Show one order and its progress
    Track { id: String },
    /// Move an order one step forward
    Advance { id: String },
    /// Mark an order delivered
    Deliver { id: String },
    /// Set any status, in any direction
    SetStatus { id: String, status: OrderStatus },
    /// Kitchen board with counts and waiting times
    Kitchen(KitchenArgs),
}

#[derive(Debug, Args)]
struct QuoteArgs {
    product: String,

    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    crust: Option<String>,

    #[arg(long = "topping")]
    toppings: Vec<String>,

    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Product id, optionally with a quantity: `9` or `9x2`
    #[arg(long = "item", required = true)]
    items: Vec<ItemSpec>,

    #[arg(long)]
    name: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    address: String,

    #[arg(long)]
    notes: Option<String>,

    #[arg(long, default_value = "normal")]
    priority: Priority,
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// `all`, `active` or a status name
    #[arg(long, default_value = "all")]
    filter: BoardFilter,
}

#[derive(Debug, Args)]
struct KitchenArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Keep refreshing until interrupted
    #[arg(long)]
    watch: bool,
}

#[derive(Debug, Clone)]
struct ItemSpec {
    product: ProductId,
    quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only a trailing `x<digits>` is a quantity; ids may contain `x`.
        let (product, quantity) = match s.rsplit_once('x') {
            Some((product, digits))
                if !product.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
            {
                let quantity = digits
                    .parse()
                    .map_err(|_| format!("invalid quantity in item: {s}"))?;
                (product, quantity)
            }
            _ => (s, 1),
        };
        Ok(Self {
            product: ProductId::from(product.trim()),
            quantity,
        })
    }
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();
    setup_tracing();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let system = PizzeriaSystem::start(&cli.settings);

    let result = match cli.command {
        Commands::Menu => show_menu(&system),
        Commands::Quote(args) => quote(&system, args),
        Commands::Order(args) => place_order(&system, args).await,
        Commands::Orders(args) => list_orders(&system, args.filter).await,
        Commands::Track { id } => track(&system, id.into()).await,
        Commands::Advance { id } => {
            let order = system.kitchen.advance(id.clone().into()).await;
            report_change(order, &id)
        }
        Commands::Deliver { id } => {
            let order = system.kitchen.mark_delivered(id.clone().into()).await;
            report_change(order, &id)
        }
        Commands::SetStatus { id, status } => {
            let order = system.kitchen.set_status(id.clone().into(), status).await;
            report_change(order, &id)
        }
        Commands::Kitchen(args) => kitchen(&system, &cli.settings, args).await,
    };

    system.shutdown().await?;
    result
}

fn show_menu(system: &PizzeriaSystem) -> Result<(), String> {
    let mut builder = Builder::default();
    builder.push_record(["Id", "", "Product", "Category", "Price"]);
    for product in system.catalog.products() {
        builder.push_record([
            product.id.to_string(),
            product.icon.clone(),
            product.name.clone(),
            product.category.to_string(),
            money(product.base_price),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::last(), Alignment::right());
    println!("{table}");

    if DeliveryHours::default().is_open_now() {
        println!("Open for delivery now.");
    } else {
        println!("Closed for delivery.");
    }
    Ok(())
}

fn quote(system: &PizzeriaSystem, args: QuoteArgs) -> Result<(), String> {
    let product = find_product(system.catalog.as_ref(), &args.product.as_str().into())?;

    let mut customization = Customization::defaults_for(&system.pricing, &product);
    if args.size.is_some() {
        customization.size = args.size;
    }
    if args.crust.is_some() {
        customization.crust = args.crust;
    }
    customization.toppings = args.toppings.into_iter().collect::<BTreeSet<_>>();
    customization.quantity = args.quantity;

    let line = system
        .pricing
        .customize(&product, &customization)
        .map_err(|error| error.to_string())?;

    println!("{} {}", product.icon, product.name);
    if let Some(size) = &line.size {
        println!("  size:     {size}");
    }
    if let Some(crust) = &line.crust {
        println!("  crust:    {crust}");
    }
    for topping in &line.toppings {
        println!("  + {topping}");
    }
    let unit = line.unit_price(&system.pricing).map_err(|error| error.to_string())?;
    let total = line.total(&system.pricing).map_err(|error| error.to_string())?;
    println!("  unit:     {}", money(unit));
    println!("  total:    {}", money(total));
    Ok(())
}

async fn place_order(system: &PizzeriaSystem, args: OrderArgs) -> Result<(), String> {
    let mut cart = Cart::new();
    for item in &args.items {
        let product = find_product(system.catalog.as_ref(), &item.product)?;
        let customization = Customization {
            size: None,
            crust: None,
            toppings: BTreeSet::new(),
            quantity: item.quantity,
        };
        let line = system
            .pricing
            .customize(&product, &customization)
            .map_err(|error| format!("{}: {error}", item.product))?;
        cart.add(line);
    }

    let mut customer = CustomerDetails::new(args.name, args.phone, args.address);
    if let Some(notes) = args.notes {
        customer = customer.with_notes(notes);
    }
    let form = CheckoutForm::new(customer).with_priority(args.priority);

    let order = system
        .checkout
        .place_order(&mut cart, form)
        .await
        .map_err(|error| error.to_string())?;

    println!("Order {} placed: {} item(s), {}", order.id, order.item_count(), money(order.total));

    let estimate = DeliveryEstimate::for_address(&order.customer.address);
    match DeliveryHours::default().next_delivery(Zoned::now().hour()) {
        NextDelivery::Now => println!(
            "Estimated delivery in {}-{} min.",
            estimate.min_minutes, estimate.max_minutes
        ),
        NextDelivery::Today { hour } => println!("Delivery starts today at {hour}:00."),
        NextDelivery::Tomorrow { hour } => println!("Delivery resumes tomorrow at {hour}:00."),
    }
    Ok(())
}

async fn list_orders(system: &PizzeriaSystem, filter: BoardFilter) -> Result<(), String> {
    let snapshot = system.kitchen.snapshot().await.map_err(|error| error.to_string())?;
    print_board(&snapshot, filter);
    Ok(())
}

async fn track(system: &PizzeriaSystem, id: OrderId) -> Result<(), String> {
    let order = system
        .orders
        .get(id.clone())
        .await
        .map_err(|error| error.to_string())?
        .ok_or_else(|| format!("order not found: {id}"))?;

    println!("Order {} for {}", order.id, order.customer.name);
    println!("  placed:   {}", local_time(&order));
    println!("  address:  {}", format_address(&order.customer.address));
    println!("  priority: {}", order.priority);
    for line in &order.items {
        println!("  {} x {} {}", line.quantity, line.product.icon, line.product.name);
    }
    println!("  total:    {}", money(order.total));
    println!(
        "  status:   {} ({}%)",
        order.status,
        order.status.progress_percent()
    );
    println!("  eta:      {}", remaining_label(order.status));
    Ok(())
}

fn remaining_label(status: OrderStatus) -> String {
    match status.remaining_minutes() {
        Some((low, high)) if low == high => format!("{low} min"),
        Some((low, high)) => format!("{low}-{high} min"),
        None => "completed".to_string(),
    }
}

fn report_change(
    order: Result<Option<Order>, pizzeria::order_actor::OrderError>,
    id: &str,
) -> Result<(), String> {
    match order.map_err(|error| error.to_string())? {
        Some(order) => {
            println!("Order {} is now {}.", order.id, order.status);
            Ok(())
        }
        None => Err(format!("order not found: {id}")),
    }
}

async fn kitchen(system: &PizzeriaSystem, settings: &Settings, args: KitchenArgs) -> Result<(), String> {
    let filter = args.filter.filter;
    if !args.watch {
        return list_orders(system, filter).await;
    }

    let (mut receiver, handle) = system.kitchen.spawn_refresh(settings.refresh_period());
    loop {
        tokio::select! {
            changed = receiver.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = receiver.borrow_and_update().clone();
                print_board(&snapshot, filter);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    drop(receiver);
    handle.await.map_err(|error| format!("board refresh failed: {error}"))
}

fn print_board(snapshot: &BoardSnapshot, filter: BoardFilter) {
    let summary = snapshot.summary();
    println!(
        "{} orders, {} active, {} delivered",
        summary.total, summary.active, summary.delivered
    );

    let mut builder = Builder::default();
    builder.push_record(["Order", "Customer", "Address", "Items", "Total", "Status", "Priority", "Waiting"]);
    for ticket in snapshot.tickets(filter) {
        builder.push_record([
            ticket.order.id.to_string(),
            ticket.order.customer.name.clone(),
            format_address(&ticket.order.customer.address),
            ticket.order.item_count().to_string(),
            money(ticket.order.total),
            ticket.order.status.to_string(),
            ticket.order.priority.to_string(),
            ticket.elapsed_label(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());
    println!("{table}");
}

fn find_product(catalog: &dyn ProductCatalog, id: &ProductId) -> Result<pizzeria::model::Product, String> {
    catalog.find(id).ok_or_else(|| format!("no such product: {id}"))
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn local_time(order: &Order) -> String {
    order
        .created_at
        .to_zoned(TimeZone::system())
        .strftime("%Y-%m-%d %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(s: &str) -> (String, u32) {
        let spec: ItemSpec = s.parse().unwrap();
        (spec.product.to_string(), spec.quantity)
    }

    #[test]
    fn test_item_quantity_suffix() {
        assert_eq!(item("9"), ("9".to_string(), 1));
        assert_eq!(item("9x2"), ("9".to_string(), 2));
        assert_eq!(item(" 9 x3"), ("9".to_string(), 3));
    }

    #[test]
    fn test_item_ids_may_contain_x() {
        assert_eq!(item("xl1"), ("xl1".to_string(), 1));
        assert_eq!(item("box"), ("box".to_string(), 1));
        assert_eq!(item("maxi-x"), ("maxi-x".to_string(), 1));
        assert_eq!(item("xl1x4"), ("xl1".to_string(), 4));
        assert_eq!(item("x5"), ("x5".to_string(), 1));
    }

    #[test]
    fn test_item_quantity_out_of_range() {
        assert!("9x99999999999".parse::<ItemSpec>().is_err());
    }
}
