use chrono::NaiveDate;
use rust_decimal_macros::dec;

use invoicepad_app::{InvoiceSession, SessionError};
use invoicepad_core::{SettingsField, ValidationError};
use invoicepad_infra::{AppConfig, SettingsError};
use invoicepad_invoicing::BusinessSettings;
use invoicepad_render::{Element, PdfFonts};

fn file_config(dir: &std::path::Path) -> AppConfig {
    AppConfig {
        data_dir: Some(dir.to_path_buf()),
        ..AppConfig::default()
    }
}

fn generated_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(18, 5, 0)
        .unwrap()
}

#[test]
fn draft_to_document() {
    invoicepad_observability::init();
    let mut session = InvoiceSession::open(&AppConfig::default()).unwrap();

    session.add_item_from_input("Pen", "10", "2.50").unwrap();
    let notebook = session.add_item_from_input("Notebook", "3", "45").unwrap();
    let extra = session.add_item_from_input("Eraser", "1", "5").unwrap();
    session.remove_item(extra.item_id());
    session.remove_item(extra.item_id());

    let totals = session.totals().unwrap();
    assert_eq!(totals.subtotal, dec!(160.00));
    assert_eq!(totals.tax_amount, dec!(28.80));
    assert_eq!(totals.grand_total, dec!(188.80));

    let draft = session.draft_mut();
    draft.bill_number = "INV-204".to_string();
    draft.customer_name = "Meera Patil".to_string();
    draft.bill_date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let preview = session.preview().unwrap();
    assert!(preview.contains("Bill No: INV-204"));
    assert!(preview.contains("Grand Total: ₹188.80"));

    let doc = session.generate_document_at(generated_at()).unwrap();
    assert_eq!(doc.file_name, "Invoice_INV-204_20261016_1805.pdf");
    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.pages[0].rows[1].cells[1], "Notebook");
    assert_eq!(doc.pages[0].rows[1].serial, Some(2));
    assert!(doc.pages[0].rows[2].is_blank());
    assert_eq!(session.items()[1], notebook);

    let has_grand_total = doc.pages[0].elements.iter().any(|e| {
        matches!(e, Element::Text(run) if run.text == "Rs.188.80")
    });
    assert!(has_grand_total);
}

#[test]
fn settings_survive_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path());

    let mut first = InvoiceSession::open(&config).unwrap();
    assert_eq!(first.settings(), &BusinessSettings::default());
    let mine = BusinessSettings {
        shop_name: "Patil Hardware".to_string(),
        shop_logo: String::new(),
        shop_address: "Main Road, Satara".to_string(),
        shop_contact: "Phone: 020-1234 | Email: hw@patil.test".to_string(),
        tax_registration_id: "27ABCDE1234F1Z5".to_string(),
    };
    first.save_settings(&mine).unwrap();

    let second = InvoiceSession::open(&config).unwrap();
    assert_eq!(second.settings().shop_name, "Patil Hardware");
    assert_eq!(second.settings().shop_logo, BusinessSettings::default().shop_logo);
}

#[test]
fn invalid_settings_keep_the_previous_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path());
    let mut session = InvoiceSession::open(&config).unwrap();

    let bad = BusinessSettings {
        shop_address: String::new(),
        ..BusinessSettings::default()
    };
    let err = session.save_settings(&bad).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Settings(SettingsError::Validation(ValidationError::MissingRequiredField {
            field: SettingsField::ShopAddress
        }))
    ));
    assert_eq!(session.settings(), &BusinessSettings::default());

    session.restore_default_settings().unwrap();
    let reopened = InvoiceSession::open(&config).unwrap();
    assert_eq!(reopened.settings(), &BusinessSettings::default());
}

#[test]
fn custom_rows_per_page_paginates() {
    let config = AppConfig {
        rows_per_page: 5,
        ..AppConfig::default()
    };
    let mut session = InvoiceSession::open(&config).unwrap();
    for i in 0..12 {
        session
            .add_item(&format!("Part {i}"), dec!(1), dec!(1.5))
            .unwrap();
    }
    let draft = session.draft_mut();
    draft.bill_number = "P-1".to_string();
    draft.customer_name = "Workshop".to_string();

    let doc = session.generate_document_at(generated_at()).unwrap();
    assert_eq!(doc.page_count(), 3);
    assert!(doc.pages.iter().all(|p| p.rows.len() == 5));
    assert_eq!(doc.pages[2].rows.iter().filter(|r| r.is_blank()).count(), 3);
}

#[test]
fn saved_invoice_is_a_pdf_named_after_the_bill() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = InvoiceSession::open(&file_config(dir.path())).unwrap();
    let Ok(fonts) = PdfFonts::load(None, None) else {
        // No sans font installed on this machine.
        return;
    };
    session.set_fonts(fonts);

    session.add_item_from_input("Pen", "10", "2.50").unwrap();
    session.add_item_from_input("Blue\nGel Pen", "2", "15").unwrap();
    let draft = session.draft_mut();
    draft.bill_number = "INV-310".to_string();
    draft.customer_name = "Meera Patil".to_string();
    draft.customer_address = "Moti Chowk\nPhaltan\nSatara\nMaharashtra".to_string();

    let pdf = session.generate_pdf_at(generated_at()).unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert_eq!(pdf.file_name, "Invoice_INV-310_20261016_1805.pdf");
    assert_eq!(pdf.pages, 1);

    let path = session.save_pdf(dir.path()).unwrap();
    assert_eq!(path.parent(), Some(dir.path()));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}
