use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use shopfront_core::auth::{
    AuthClient, AuthManager, CredentialStore, FileCredentialStore, LoginRequest, RegisterRequest,
};
use shopfront_core::client::{
    login_reason_message, ApiClient, ApiError, RedirectHandler, RedirectReason,
};
use shopfront_core::config::ApiConfig;
use shopfront_core::services::account::{AccountService, Address, NewAddress, ProfileUpdate};
use shopfront_core::services::admin::{
    AdminService, CreateProductRequest, UpdateProductRequest, UserListParams,
};
use shopfront_core::services::cart::{AddCartItemRequest, CartService};
use shopfront_core::services::orders::{CreateOrderRequest, OrderListParams, OrderService};
use shopfront_core::services::products::{Money, Product, ProductListParams, ProductService};
use textwrap::wrap;
use tokio::task;
use tracing_subscriber::EnvFilter;

const DESCRIPTION_WIDTH: usize = 72;

#[derive(Parser, Debug)]
#[command(author, version, about = "Storefront terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Authentication related commands
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Profile, addresses, and wishlist
    #[command(subcommand)]
    Account(AccountCommand),
    /// Catalog browsing
    #[command(subcommand)]
    Product(ProductCommand),
    /// Cart operations
    #[command(subcommand)]
    Cart(CartCommand),
    /// Order history and checkout
    #[command(subcommand)]
    Order(OrderCommand),
    /// Admin-only operations
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Log in with email and password
    Login(LoginArgs),
    /// Create a new account
    Register(RegisterArgs),
    /// Forget stored credentials
    Logout,
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,
    /// Password (prompted when omitted)
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    /// Password (prompted when omitted)
    #[arg(long)]
    password: Option<String>,
    #[arg(long = "first-name")]
    first_name: String,
    #[arg(long = "last-name")]
    last_name: String,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Show the current authenticated user
    Me(JsonArgs),
    /// Update profile fields
    Update(ProfileUpdateArgs),
    /// List saved addresses
    Addresses(JsonArgs),
    /// Save a new address
    AddAddress(AddAddressArgs),
    /// List wishlist entries
    Wishlist(JsonArgs),
    /// Add a product to the wishlist
    WishlistAdd(ProductIdArg),
}

#[derive(Args, Debug)]
struct JsonArgs {
    /// Output raw JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ProfileUpdateArgs {
    #[arg(long = "first-name")]
    first_name: Option<String>,
    #[arg(long = "last-name")]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long = "avatar-url")]
    avatar_url: Option<String>,
}

#[derive(Args, Debug)]
struct AddAddressArgs {
    #[arg(long)]
    label: String,
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long = "zip-code")]
    zip_code: String,
    #[arg(long)]
    country: String,
    /// Mark as the default shipping address
    #[arg(long)]
    default: bool,
}

#[derive(Args, Debug)]
struct ProductIdArg {
    /// Product id
    product_id: String,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    /// List products
    List(ProductListArgs),
    /// View a single product
    View(ProductViewArgs),
    /// Search products by term
    Search(ProductSearchArgs),
    /// List categories
    Categories(JsonArgs),
}

#[derive(Args, Debug)]
struct ProductListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long = "page-size")]
    page_size: Option<u32>,
    /// Filter by category id
    #[arg(long = "category-id")]
    category_id: Option<String>,
    /// Output raw JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ProductViewArgs {
    /// Product id
    id: String,
    /// Output raw JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ProductSearchArgs {
    /// Search term
    query: String,
    /// Output raw JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum CartCommand {
    /// Show the current cart
    Show(JsonArgs),
    /// Add a product to the cart
    Add(CartAddArgs),
    /// Change the quantity of a cart line
    Update(CartUpdateArgs),
    /// Remove a product from the cart
    Remove(ProductIdArg),
    /// Empty the cart
    Clear,
}

#[derive(Args, Debug)]
struct CartAddArgs {
    #[arg(long = "product-id")]
    product_id: String,
    /// Display name snapshot for the cart line
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 1)]
    quantity: u32,
    /// Unit price in cents
    #[arg(long = "price-cents")]
    price_cents: i64,
    #[arg(long, default_value = "USD")]
    currency: String,
    #[arg(long = "image-url")]
    image_url: Option<String>,
}

#[derive(Args, Debug)]
struct CartUpdateArgs {
    #[arg(long = "product-id")]
    product_id: String,
    #[arg(long)]
    quantity: u32,
}

#[derive(Subcommand, Debug)]
enum OrderCommand {
    /// List past orders
    List(OrderListArgs),
    /// View a single order
    View(OrderViewArgs),
    /// Place an order from the current cart
    Create(OrderCreateArgs),
    /// Cancel an order
    Cancel(OrderCancelArgs),
}

#[derive(Args, Debug)]
struct OrderListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long = "page-size")]
    page_size: Option<u32>,
    /// Filter by status
    #[arg(long)]
    status: Option<String>,
    /// Output raw JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct OrderViewArgs {
    /// Order id
    id: String,
    /// Output raw JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct OrderCreateArgs {
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long = "zip-code")]
    zip_code: String,
    #[arg(long)]
    country: String,
    #[arg(long = "payment-method-id")]
    payment_method_id: String,
}

#[derive(Args, Debug)]
struct OrderCancelArgs {
    /// Order id
    id: String,
    /// Reason recorded with the cancellation
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// List registered users
    Users(AdminUsersArgs),
    /// Create a product
    ProductCreate(AdminProductCreateArgs),
    /// Update a product
    ProductUpdate(AdminProductUpdateArgs),
    /// Delete a product
    ProductDelete(ProductIdArg),
}

#[derive(Args, Debug)]
struct AdminUsersArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long = "page-size")]
    page_size: Option<u32>,
    /// Output raw JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AdminProductCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    slug: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Price in cents
    #[arg(long = "price-cents")]
    price_cents: i64,
    #[arg(long, default_value = "USD")]
    currency: String,
    #[arg(long = "category-id")]
    category_id: String,
    /// Image URLs (repeatable)
    #[arg(long = "image-url")]
    image_urls: Vec<String>,
    #[arg(long = "stock-quantity", default_value_t = 0)]
    stock_quantity: i64,
}

#[derive(Args, Debug)]
struct AdminProductUpdateArgs {
    /// Product id
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    slug: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Price in cents
    #[arg(long = "price-cents")]
    price_cents: i64,
    #[arg(long, default_value = "USD")]
    currency: String,
    #[arg(long = "category-id")]
    category_id: String,
    /// Image URLs (repeatable)
    #[arg(long = "image-url")]
    image_urls: Vec<String>,
    #[arg(long = "stock-quantity", default_value_t = 0)]
    stock_quantity: i64,
    /// Keep the product visible in the storefront
    #[arg(long, default_value_t = true)]
    active: bool,
}

/// Prints the fixed login banner when the pipeline gives up on a session.
struct BannerRedirect;

impl RedirectHandler for BannerRedirect {
    fn redirect_to_login(&self, reason: RedirectReason) {
        if let Some(message) = login_reason_message(reason.as_str()) {
            eprintln!("{message} Run `shopfront auth login`.");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Auth(cmd) => match cmd {
            AuthCommand::Login(args) => auth_login(args).await?,
            AuthCommand::Register(args) => auth_register(args).await?,
            AuthCommand::Logout => auth_logout()?,
        },
        Commands::Account(cmd) => match cmd {
            AccountCommand::Me(args) => account_me(args).await?,
            AccountCommand::Update(args) => account_update(args).await?,
            AccountCommand::Addresses(args) => account_addresses(args).await?,
            AccountCommand::AddAddress(args) => account_add_address(args).await?,
            AccountCommand::Wishlist(args) => account_wishlist(args).await?,
            AccountCommand::WishlistAdd(args) => account_wishlist_add(args).await?,
        },
        Commands::Product(cmd) => match cmd {
            ProductCommand::List(args) => product_list(args).await?,
            ProductCommand::View(args) => product_view(args).await?,
            ProductCommand::Search(args) => product_search(args).await?,
            ProductCommand::Categories(args) => product_categories(args).await?,
        },
        Commands::Cart(cmd) => match cmd {
            CartCommand::Show(args) => cart_show(args).await?,
            CartCommand::Add(args) => cart_add(args).await?,
            CartCommand::Update(args) => cart_update(args).await?,
            CartCommand::Remove(args) => cart_remove(args).await?,
            CartCommand::Clear => cart_clear().await?,
        },
        Commands::Order(cmd) => match cmd {
            OrderCommand::List(args) => order_list(args).await?,
            OrderCommand::View(args) => order_view(args).await?,
            OrderCommand::Create(args) => order_create(args).await?,
            OrderCommand::Cancel(args) => order_cancel(args).await?,
        },
        Commands::Admin(cmd) => match cmd {
            AdminCommand::Users(args) => admin_users(args).await?,
            AdminCommand::ProductCreate(args) => admin_product_create(args).await?,
            AdminCommand::ProductUpdate(args) => admin_product_update(args).await?,
            AdminCommand::ProductDelete(args) => admin_product_delete(args).await?,
        },
    }
    Ok(())
}

fn credential_store() -> Result<Arc<dyn CredentialStore>> {
    let store =
        FileCredentialStore::with_default_locator().context("unable to initialise credential store")?;
    Ok(Arc::new(store))
}

fn build_client() -> Result<ApiClient> {
    let config = ApiConfig::from_env().context("invalid backend configuration")?;
    let client = ApiClient::new(&config, credential_store()?)
        .context("failed to build API client")?
        .with_redirect_handler(Arc::new(BannerRedirect));
    Ok(client)
}

fn auth_manager() -> Result<AuthManager> {
    let config = ApiConfig::from_env().context("invalid backend configuration")?;
    let client = AuthClient::new(&config).context("failed to build auth client")?;
    Ok(AuthManager::new(credential_store()?, client))
}

/// Surface the backend's own failure message when it provides one.
fn friendly(err: ApiError, fallback: &'static str) -> anyhow::Error {
    anyhow!(err.message(fallback))
}

async fn prompt_for_password() -> Result<String> {
    task::spawn_blocking(|| {
        use std::io::{self, Write};
        print!("Password: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim_end_matches(['\r', '\n']).to_owned())
    })
    .await
    .context("password prompt task failed")?
}

async fn auth_login(args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_for_password().await?,
    };
    let manager = auth_manager()?;
    let user = manager
        .login(&LoginRequest {
            email: args.email,
            password,
        })
        .await
        .context("login failed")?;
    println!("Logged in as {} ({}).", user.email, user.role);
    Ok(())
}

async fn auth_register(args: RegisterArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_for_password().await?,
    };
    let manager = auth_manager()?;
    let user = manager
        .register(&RegisterRequest {
            email: args.email,
            password,
            first_name: args.first_name,
            last_name: args.last_name,
        })
        .await
        .context("registration failed")?;
    println!("Account created for {}. You are now logged in.", user.email);
    Ok(())
}

fn auth_logout() -> Result<()> {
    auth_manager()?
        .logout()
        .context("failed to remove stored credentials")?;
    println!("Logged out.");
    Ok(())
}

async fn account_me(args: JsonArgs) -> Result<()> {
    let service = AccountService::new(build_client()?);
    let user = service
        .me()
        .await
        .map_err(|err| friendly(err, "failed to fetch account"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }
    println!("{} ({})", user.email, user.role);
    if let Some(profile) = user.profile {
        println!("Name:  {} {}", profile.first_name, profile.last_name);
        if let Some(phone) = profile.phone {
            println!("Phone: {phone}");
        }
    }
    println!("Since: {}", user.created_at.format("%Y-%m-%d"));
    Ok(())
}

async fn account_update(args: ProfileUpdateArgs) -> Result<()> {
    let update = ProfileUpdate {
        first_name: args.first_name,
        last_name: args.last_name,
        phone: args.phone,
        avatar_url: args.avatar_url,
    };
    let service = AccountService::new(build_client()?);
    let user = service
        .update_profile(&update)
        .await
        .map_err(|err| friendly(err, "failed to update profile"))?;
    println!("Profile updated for {}.", user.email);
    Ok(())
}

async fn account_addresses(args: JsonArgs) -> Result<()> {
    let service = AccountService::new(build_client()?);
    let addresses = service
        .addresses()
        .await
        .map_err(|err| friendly(err, "failed to fetch addresses"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&addresses)?);
        return Ok(());
    }
    if addresses.is_empty() {
        println!("No saved addresses.");
        return Ok(());
    }
    for entry in addresses {
        let marker = if entry.is_default { " (default)" } else { "" };
        let a = &entry.address;
        println!(
            "{}{}: {}, {}, {} {}, {}",
            entry.label, marker, a.street, a.city, a.state, a.zip_code, a.country
        );
    }
    Ok(())
}

async fn account_add_address(args: AddAddressArgs) -> Result<()> {
    let service = AccountService::new(build_client()?);
    let saved = service
        .add_address(&NewAddress {
            label: args.label,
            address: Address {
                street: args.street,
                city: args.city,
                state: args.state,
                zip_code: args.zip_code,
                country: args.country,
            },
            is_default: args.default,
        })
        .await
        .map_err(|err| friendly(err, "failed to save address"))?;
    println!("Saved address '{}'.", saved.label);
    Ok(())
}

async fn account_wishlist(args: JsonArgs) -> Result<()> {
    let service = AccountService::new(build_client()?);
    let items = service
        .wishlist()
        .await
        .map_err(|err| friendly(err, "failed to fetch wishlist"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("Wishlist is empty.");
        return Ok(());
    }
    for item in items {
        println!(
            "{}  (added {})",
            item.product_id,
            item.added_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

async fn account_wishlist_add(args: ProductIdArg) -> Result<()> {
    let service = AccountService::new(build_client()?);
    service
        .add_to_wishlist(&args.product_id)
        .await
        .map_err(|err| friendly(err, "failed to add to wishlist"))?;
    println!("Added {} to wishlist.", args.product_id);
    Ok(())
}

async fn product_list(args: ProductListArgs) -> Result<()> {
    let service = ProductService::new(build_client()?);
    let page = service
        .list(ProductListParams {
            page: args.page,
            page_size: args.page_size,
            category_id: args.category_id,
        })
        .await
        .map_err(|err| friendly(err, "failed to list products"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page.products)?);
        return Ok(());
    }
    for product in &page.products {
        println!(
            "{}  {}  {}  stock {}",
            product.id,
            product.name,
            format_money(&product.price),
            product.stock_quantity
        );
    }
    println!(
        "Page {}/{} ({} products)",
        page.pagination.page, page.pagination.total_pages, page.pagination.total_count
    );
    Ok(())
}

async fn product_view(args: ProductViewArgs) -> Result<()> {
    let service = ProductService::new(build_client()?);
    let product = service
        .get(&args.id)
        .await
        .map_err(|err| friendly(err, "failed to fetch product"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }
    print_product(&product);
    Ok(())
}

async fn product_search(args: ProductSearchArgs) -> Result<()> {
    let service = ProductService::new(build_client()?);
    let page = service
        .search(&args.query)
        .await
        .map_err(|err| friendly(err, "search failed"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page.products)?);
        return Ok(());
    }
    if page.products.is_empty() {
        println!("No products match '{}'.", args.query);
        return Ok(());
    }
    for product in &page.products {
        println!("{}  {}  {}", product.id, product.name, format_money(&product.price));
    }
    Ok(())
}

async fn product_categories(args: JsonArgs) -> Result<()> {
    let service = ProductService::new(build_client()?);
    let categories = service
        .categories()
        .await
        .map_err(|err| friendly(err, "failed to list categories"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }
    for category in categories {
        println!("{}  {}", category.id, category.name);
    }
    Ok(())
}

async fn cart_show(args: JsonArgs) -> Result<()> {
    let service = CartService::new(build_client()?);
    let cart = service
        .get()
        .await
        .map_err(|err| friendly(err, "failed to fetch cart"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cart)?);
        return Ok(());
    }
    if cart.items.is_empty() {
        println!("Cart is empty.");
        return Ok(());
    }
    for item in &cart.items {
        println!(
            "{} x{}  {}  ({} each)",
            item.product_name,
            item.quantity,
            format_money(&item.total_price),
            format_money(&item.unit_price)
        );
    }
    println!("Total: {}", format_money(&cart.total));
    Ok(())
}

async fn cart_add(args: CartAddArgs) -> Result<()> {
    let service = CartService::new(build_client()?);
    let cart = service
        .add_item(&AddCartItemRequest {
            product_id: args.product_id,
            product_name: args.name,
            quantity: args.quantity,
            unit_price: Money {
                amount_cents: args.price_cents,
                currency: args.currency,
            },
            image_url: args.image_url,
        })
        .await
        .map_err(|err| friendly(err, "failed to add to cart"))?;
    println!("Cart now has {} line(s), total {}.", cart.items.len(), format_money(&cart.total));
    Ok(())
}

async fn cart_update(args: CartUpdateArgs) -> Result<()> {
    let service = CartService::new(build_client()?);
    let cart = service
        .update_item(&args.product_id, args.quantity)
        .await
        .map_err(|err| friendly(err, "failed to update cart"))?;
    println!("Updated. Cart total {}.", format_money(&cart.total));
    Ok(())
}

async fn cart_remove(args: ProductIdArg) -> Result<()> {
    let service = CartService::new(build_client()?);
    let cart = service
        .remove_item(&args.product_id)
        .await
        .map_err(|err| friendly(err, "failed to remove from cart"))?;
    println!("Removed. Cart total {}.", format_money(&cart.total));
    Ok(())
}

async fn cart_clear() -> Result<()> {
    let service = CartService::new(build_client()?);
    service
        .clear()
        .await
        .map_err(|err| friendly(err, "failed to clear cart"))?;
    println!("Cart cleared.");
    Ok(())
}

async fn order_list(args: OrderListArgs) -> Result<()> {
    let service = OrderService::new(build_client()?);
    let page = service
        .list(OrderListParams {
            page: args.page,
            page_size: args.page_size,
            status: args.status,
        })
        .await
        .map_err(|err| friendly(err, "failed to list orders"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page.orders)?);
        return Ok(());
    }
    if page.orders.is_empty() {
        println!("No orders.");
        return Ok(());
    }
    for order in &page.orders {
        println!(
            "{}  {}  status {}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.status,
            format_money(&order.total)
        );
    }
    println!(
        "Page {}/{} ({} orders)",
        page.pagination.page, page.pagination.total_pages, page.pagination.total_count
    );
    Ok(())
}

async fn order_view(args: OrderViewArgs) -> Result<()> {
    let service = OrderService::new(build_client()?);
    let order = service
        .get(&args.id)
        .await
        .map_err(|err| friendly(err, "failed to fetch order"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
        return Ok(());
    }
    println!("Order {}  status {}", order.id, order.status);
    for item in &order.items {
        println!(
            "  {} x{}  {}",
            item.product_name,
            item.quantity,
            format_money(&item.total_price)
        );
    }
    println!("  Subtotal: {}", format_money(&order.subtotal));
    println!("  Shipping: {}", format_money(&order.shipping));
    println!("  Tax:      {}", format_money(&order.tax));
    println!("  Total:    {}", format_money(&order.total));
    if let Some(tracking) = &order.tracking_number {
        println!("  Tracking: {tracking}");
    }
    if let Some(history) = &order.history {
        println!("  History:");
        for entry in history {
            println!(
                "    {}  status {}  {}",
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.status,
                entry.notes
            );
        }
    }
    Ok(())
}

async fn order_create(args: OrderCreateArgs) -> Result<()> {
    let service = OrderService::new(build_client()?);
    let order = service
        .create(&CreateOrderRequest {
            shipping_address: Address {
                street: args.street,
                city: args.city,
                state: args.state,
                zip_code: args.zip_code,
                country: args.country,
            },
            payment_method_id: args.payment_method_id,
        })
        .await
        .map_err(|err| friendly(err, "failed to place order"))?;
    println!("Order {} placed, total {}.", order.id, format_money(&order.total));
    Ok(())
}

async fn order_cancel(args: OrderCancelArgs) -> Result<()> {
    let service = OrderService::new(build_client()?);
    let order = service
        .cancel(&args.id, args.reason.as_deref())
        .await
        .map_err(|err| friendly(err, "failed to cancel order"))?;
    println!("Order {} cancelled.", order.id);
    Ok(())
}

async fn admin_users(args: AdminUsersArgs) -> Result<()> {
    let service = AdminService::new(build_client()?);
    let page = service
        .list_users(UserListParams {
            page: args.page,
            page_size: args.page_size,
        })
        .await
        .map_err(|err| friendly(err, "failed to list users"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page.users)?);
        return Ok(());
    }
    for user in &page.users {
        println!("{}  {}  {}", user.id, user.email, user.role);
    }
    println!(
        "Page {}/{} ({} users)",
        page.pagination.page, page.pagination.total_pages, page.pagination.total_count
    );
    Ok(())
}

async fn admin_product_create(args: AdminProductCreateArgs) -> Result<()> {
    let service = AdminService::new(build_client()?);
    let product = service
        .create_product(&CreateProductRequest {
            name: args.name,
            slug: args.slug,
            description: args.description,
            price: Money {
                amount_cents: args.price_cents,
                currency: args.currency,
            },
            category_id: args.category_id,
            image_urls: args.image_urls,
            stock_quantity: args.stock_quantity,
        })
        .await
        .map_err(|err| friendly(err, "failed to create product"))?;
    println!("Created product {} ({}).", product.name, product.id);
    Ok(())
}

async fn admin_product_update(args: AdminProductUpdateArgs) -> Result<()> {
    let service = AdminService::new(build_client()?);
    let product = service
        .update_product(
            &args.id,
            &UpdateProductRequest {
                name: args.name,
                slug: args.slug,
                description: args.description,
                price: Money {
                    amount_cents: args.price_cents,
                    currency: args.currency,
                },
                category_id: args.category_id,
                image_urls: args.image_urls,
                stock_quantity: args.stock_quantity,
                is_active: args.active,
            },
        )
        .await
        .map_err(|err| friendly(err, "failed to update product"))?;
    println!("Updated product {}.", product.id);
    Ok(())
}

async fn admin_product_delete(args: ProductIdArg) -> Result<()> {
    let service = AdminService::new(build_client()?);
    service
        .delete_product(&args.product_id)
        .await
        .map_err(|err| friendly(err, "failed to delete product"))?;
    println!("Deleted product {}.", args.product_id);
    Ok(())
}

fn print_product(product: &Product) {
    println!("{}  ({})", product.name, product.slug);
    println!(
        "{}  stock {}  {}",
        format_money(&product.price),
        product.stock_quantity,
        if product.is_active { "active" } else { "inactive" }
    );
    if !product.description.is_empty() {
        println!();
        for line in wrap(&product.description, DESCRIPTION_WIDTH) {
            println!("{line}");
        }
    }
}

fn format_money(money: &Money) -> String {
    let sign = if money.amount_cents < 0 { "-" } else { "" };
    let cents = money.amount_cents.abs();
    format!("{sign}{}.{:02} {}", cents / 100, cents % 100, money.currency)
}
