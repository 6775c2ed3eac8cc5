use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;

use entity_manager::auth::demo_users;
use entity_manager::logging::init_logger;
use entity_manager::{
    load_users_csv, Account, AccountPatch, AppConfig, BankAccountManager, Department,
    DepartmentManager, Employee, EmployeeManager, EmployeePatch, InMemorySessionStore, NewUser,
    Product, ProductManager, ProductPatch, UserDirectory,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    let mode = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .map(String::as_str)
        .unwrap_or("all");

    let config = AppConfig::from_env()?;
    init_logger(&config, verbose);

    match mode {
        "bank" => run_bank()?,
        "products" => run_products()?,
        "staff" => run_staff()?,
        "auth" => run_auth(&config)?,
        "all" => {
            run_bank()?;
            run_products()?;
            run_staff()?;
            run_auth(&config)?;
        }
        other => {
            eprintln!("❌ Unknown mode: {}", other);
            eprintln!("   Usage: entity-manager [bank|products|staff|auth|all] [-v]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_bank() -> Result<()> {
    println!("🏦 Bank accounts");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let bank = BankAccountManager::new();
    bank.create_account(Account::new(1001, "Nguyen Van A"))?;
    bank.create_account(Account::new(1002, "Tran Thi B"))?;

    bank.deposit(1001, 500000.0)?;
    bank.deposit(1002, 1000000.0)?;
    bank.withdraw(1001, 200000.0)?;

    if let Err(e) = bank.withdraw(1001, 1000000.0) {
        println!("✗ {}", e);
    }

    bank.update_account(1001, &AccountPatch::holder("Nguyen Van A Updated"))?;

    println!("Account 1001: {:?}", bank.get_account(1001));
    println!("Holder and balance: {:?}", bank.holder_and_balance(1001));
    println!("Without balance: {:?}", bank.account_without_balance(1001));
    println!("All accounts: {:?}", bank.list_all_accounts());

    bank.close_account(1002)?;
    println!("After closing 1002: {:?}", bank.list_all_accounts());
    println!("✓ {} events recorded\n", bank.events().len());

    Ok(())
}

fn run_products() -> Result<()> {
    println!("📦 Products");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let products = ProductManager::new();
    products.add_product(Product::new(1, "Laptop", 15000000.0, "Electronics"))?;
    products.add_product(Product::new(2, "Phone", 8000000.0, "Electronics"))?;
    products.add_product(Product::new(3, "Shirt", 500000.0, "Clothing"))?;

    products.update_product(1, &ProductPatch::name("Gaming Laptop"))?;

    println!("Product 1: {:?}", products.get_product(1));
    println!("Name and category: {:?}", products.name_and_category(1));
    println!("Without price: {:?}", products.product_without_price(1));
    println!("Electronics: {:?}", products.find_by_category("Electronics"));
    println!("Inventory value: {}", products.total_inventory_value());

    products.remove_product(2)?;
    println!("After removing 2: {:?}\n", products.list_all_products());

    Ok(())
}

fn run_staff() -> Result<()> {
    println!("👥 Employees and departments");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let employees = EmployeeManager::new();
    let departments = DepartmentManager::new(employees.clone());

    departments.add_department(Department::new(1, "IT"))?;
    departments.add_department(Department::new(2, "HR"))?;

    employees.add_employee(Employee::new(101, "Nguyen Van A", 25, "Developer", Some(1)))?;
    employees.add_employee(Employee::new(102, "Tran Thi B", 30, "HR Specialist", Some(2)))?;

    departments.move_employee_to_department(101, 1)?;
    departments.move_employee_to_department(102, 2)?;

    employees.update_employee(101, &EmployeePatch::position("Senior Developer"))?;

    println!("Employee 101: {:?}", employees.get_employee(101));
    println!("Basic info: {:?}", employees.basic_info(101));
    println!("Department 1 header: {:?}", departments.department_without_employees(1));
    println!("Search 'Nguyen': {:?}", employees.find_by_name("Nguyen"));
    println!("By age: {:?}", employees.sort_by_age());

    println!("\n{}\n", departments.generate_department_report(1)?);
    println!("Employees in 1: {}", departments.department_employee_count(1)?);
    println!("Average age in 1: {}", departments.average_employee_age(1)?);

    if let Err(e) = departments.remove_department(1) {
        println!("✗ {}", e);
    }
    println!();

    Ok(())
}

fn run_auth(config: &AppConfig) -> Result<()> {
    println!("🔐 Login and registration");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let directory =
        UserDirectory::with_session(Arc::new(InMemorySessionStore::new()), &config.session_key);
    let seeds = match &config.users_seed {
        Some(path) => load_users_csv(path)?,
        None => demo_users(),
    };
    directory
        .seed(seeds)
        .context("Failed to seed users")?;
    println!("✓ {} users loaded", directory.count());

    match directory.login("ladame0@guardian.co.uk", "12345678") {
        Ok(user) => println!("Welcome {}", user.full_name()),
        Err(e) => println!("✗ {}", e),
    }

    if let Err(e) = directory.login("ladame0@guardian.co.uk", "wrong-password") {
        println!("✗ {}", e);
    }

    let form = NewUser {
        first_name: "Le".to_string(),
        last_name: "Van C".to_string(),
        email: "levanc@example.com".to_string(),
        password: "secret".to_string(),
    };
    match directory.register(form) {
        Ok(user) => println!("Registered {} with id {}", user.full_name(), user.id),
        Err(e) => println!("✗ {}", e),
    }

    for user in directory.search("an") {
        println!("ID: {}, Name: {}, Email: {}", user.id, user.full_name(), user.email);
    }
    println!("Current user: {:?}\n", directory.current_user()?.map(|u| u.email));

    Ok(())
}
