use crate::core::timezone::utc_date;
use crate::core::InMemoryStore;
use crate::modules::customers::models::{Customer, CustomerType, DocumentType, DEFAULT_COUNTRY};

/// Customer registry backed by an in-memory collection
pub struct CustomerRepository {
    pub customers: InMemoryStore<Customer>,
}

impl CustomerRepository {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self {
            customers: InMemoryStore::new(customers),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_customers())
    }

    /// Any customer, active or not, holding `document_number`
    pub async fn find_by_document(&self, document_number: &str) -> Option<Customer> {
        self.customers
            .read(|items| {
                items
                    .iter()
                    .find(|c| c.document_number == document_number)
                    .cloned()
            })
            .await
    }
}

struct Contact<'a> {
    email: &'a str,
    phone: &'a str,
    address: &'a str,
    city: &'a str,
    postal_code: &'a str,
}

fn business(
    id: &str,
    ruc: &str,
    business_name: &str,
    trade_name: &str,
    contact_person: &str,
    contact: Contact<'_>,
    day: u32,
) -> Customer {
    Customer {
        business_name: Some(business_name.to_string()),
        trade_name: Some(trade_name.to_string()),
        contact_person: Some(contact_person.to_string()),
        ..base(id, CustomerType::Business, DocumentType::Ruc, ruc, contact, day)
    }
}

fn person(
    id: &str,
    document_type: DocumentType,
    document_number: &str,
    first_name: &str,
    last_name: &str,
    contact: Contact<'_>,
    day: u32,
) -> Customer {
    Customer {
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        ..base(
            id,
            CustomerType::Individual,
            document_type,
            document_number,
            contact,
            day,
        )
    }
}

fn base(
    id: &str,
    customer_type: CustomerType,
    document_type: DocumentType,
    document_number: &str,
    contact: Contact<'_>,
    day: u32,
) -> Customer {
    let created = utc_date(2024, 1, day);
    Customer {
        id: id.to_string(),
        customer_type,
        document_type,
        document_number: document_number.to_string(),
        business_name: None,
        trade_name: None,
        contact_person: None,
        first_name: None,
        last_name: None,
        email: Some(contact.email.to_string()),
        phone: Some(contact.phone.to_string()),
        address: Some(contact.address.to_string()),
        city: Some(contact.city.to_string()),
        state: Some(contact.city.to_string()),
        country: DEFAULT_COUNTRY.to_string(),
        postal_code: Some(contact.postal_code.to_string()),
        is_active: true,
        created_at: created,
        updated_at: created,
    }
}

fn seed_customers() -> Vec<Customer> {
    vec![
        business(
            "1",
            "20123456789",
            "Empresa ABC S.A.C.",
            "ABC Store",
            "Carlos Mendoza",
            Contact {
                email: "contacto@abc.com",
                phone: "+51 987654321",
                address: "Av. Principal 123",
                city: "Lima",
                postal_code: "15001",
            },
            1,
        ),
        person(
            "2",
            DocumentType::Dni,
            "12345678",
            "Juan",
            "Pérez Rodríguez",
            Contact {
                email: "juan.perez@email.com",
                phone: "+51 912345678",
                address: "Jr. Los Olivos 456",
                city: "Lima",
                postal_code: "15002",
            },
            2,
        ),
        business(
            "3",
            "20987654321",
            "Comercial XYZ E.I.R.L.",
            "XYZ Market",
            "María González",
            Contact {
                email: "info@xyz.com",
                phone: "+51 923456789",
                address: "Calle Comercio 789",
                city: "Arequipa",
                postal_code: "04001",
            },
            3,
        ),
        person(
            "4",
            DocumentType::Dni,
            "87654321",
            "Ana",
            "Torres Silva",
            Contact {
                email: "ana.torres@email.com",
                phone: "+51 934567890",
                address: "Av. Los Robles 321",
                city: "Cusco",
                postal_code: "08001",
            },
            4,
        ),
        person(
            "5",
            DocumentType::ForeignerId,
            "CE001234567",
            "Roberto",
            "Martinez",
            Contact {
                email: "roberto.martinez@email.com",
                phone: "+51 945678901",
                address: "Jr. Internacional 654",
                city: "Lima",
                postal_code: "15003",
            },
            5,
        ),
    ]
}
