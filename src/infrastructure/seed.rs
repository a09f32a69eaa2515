use crate::core::errors::UserSphereError;
use crate::core::models::user::{Address, Geo, NewUser};
use crate::infrastructure::storage::UserStore;
use tracing::info;

// name, email, phone, company, street, city, zip, lat, lng
const DEMO_USERS: [[&str; 9]; 8] = [
    [
        "Harsha Royal", "harsha.royal@example.com", "+91-9876543210", "OpenAI India",
        "11 MG Road", "Bangalore", "560001", "12.9716", "77.5946",
    ],
    [
        "Priya Sharma", "priya.sharma@example.com", "+91-9876543211", "Tech Solutions Pvt Ltd",
        "45 Park Street", "Mumbai", "400001", "19.0760", "72.8777",
    ],
    [
        "Rahul Verma", "rahul.verma@example.com", "+91-9876543212", "Digital Innovations",
        "23 Connaught Place", "New Delhi", "110001", "28.7041", "77.1025",
    ],
    [
        "Ananya Reddy", "ananya.reddy@example.com", "+91-9876543213", "StartupHub",
        "78 Hi-Tech City", "Hyderabad", "500081", "17.3850", "78.4867",
    ],
    [
        "Vikram Singh", "vikram.singh@example.com", "+91-9876543214", "Enterprise Systems",
        "56 Salt Lake City", "Kolkata", "700064", "22.5726", "88.3639",
    ],
    [
        "Sneha Patel", "sneha.patel@example.com", "+91-9876543215", "CloudTech Inc",
        "34 CG Road", "Ahmedabad", "380009", "23.0225", "72.5714",
    ],
    [
        "Arjun Kapoor", "arjun.kapoor@example.com", "+91-9876543216", "WebDev Solutions",
        "89 Koramangala", "Bangalore", "560034", "12.9352", "77.6245",
    ],
    [
        "Meera Iyer", "meera.iyer@example.com", "+91-9876543217", "InfoSys Technologies",
        "12 Anna Salai", "Chennai", "600002", "13.0827", "80.2707",
    ],
];

pub fn demo_users() -> Vec<NewUser> {
    DEMO_USERS
        .iter()
        .map(|[name, email, phone, company, street, city, zip, lat, lng]| NewUser {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            company: Some(company.to_string()),
            address: Address {
                street: street.to_string(),
                city: city.to_string(),
                zip: zip.to_string(),
                geo: Some(Geo {
                    lat: Some(lat.to_string()),
                    lng: Some(lng.to_string()),
                }),
            },
        })
        .collect()
}

/// Inserts the demo directory into an empty store. Returns how many rows were added.
pub async fn seed_demo_users(store: &dyn UserStore) -> Result<usize, UserSphereError> {
    if store.count_users().await? > 0 {
        info!("Users already exist, skipping seeding");
        return Ok(0);
    }

    let users = demo_users();
    let count = users.len();
    for user in users {
        store.create_user(user).await?;
    }
    info!(count, "Demo users seeded");
    Ok(count)
}
