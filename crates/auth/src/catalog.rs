//! Static permission catalog and department default table.
//!
//! The catalog is process-wide configuration: a closed set of capability
//! tokens grouped by department, plus the default permission subset each
//! department starts with (its own "view module" token). Nothing here is
//! mutable at runtime; any token outside the catalog is invalid input
//! everywhere else in the system.

use core::str::FromStr;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A permission token outside the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

/// A department name outside the closed department set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown department: {0}")]
pub struct UnknownDepartment(pub String);

macro_rules! permission_catalog {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// Fine-grained capability token.
        ///
        /// Variants map 1:1 to the wire names stored on user records and sent
        /// in request payloads (e.g. `ViewFleetModule` ⇄ `"view_fleet"`).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Permission {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl Permission {
            /// The full closed catalog, in declaration order.
            pub const ALL: &'static [Permission] = &[$(Permission::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Permission::$variant => $wire,)+
                }
            }
        }

        impl FromStr for Permission {
            type Err = UnknownPermission;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Permission::$variant),)+
                    other => Err(UnknownPermission(other.to_string())),
                }
            }
        }
    };
}

permission_catalog! {
    // Fleet
    ViewFleetModule => "view_fleet",
    AddDriver => "add_driver",
    EditDriver => "edit_driver",
    DeleteDriver => "delete_driver",
    CreateTrip => "create_trip",
    EditTrip => "edit_trip",
    DeleteTrip => "delete_trip",
    AssignVehicle => "assign_vehicle",
    TrackVehicle => "track_vehicle",
    AddAssetVehicle => "add_asset_vehicle",
    CreateMaintenanceRequest => "create_maintenance_request",
    ViewFleetReport => "view_fleet_report",

    // Finance
    ViewFinanceModule => "view_finance",
    ViewFinancialReports => "view_financial_reports",
    CreateInvoice => "create_invoice",
    EditInvoice => "edit_invoice",
    DeleteInvoice => "delete_invoice",
    ManagePayroll => "manage_payroll",
    ApproveBudget => "approve_budget",
    TrackExpenses => "track_expenses",
    ManageAccounts => "manage_accounts",

    // Logistics
    ViewLogisticsModule => "view_logistics",
    CreateDeliveryOrder => "create_delivery_order",
    EditDeliveryOrder => "edit_delivery_order",
    CancelDelivery => "cancel_delivery",
    TrackShipment => "track_shipment",
    ManageWarehouseInventory => "manage_warehouse_inventory",
    AssignDeliveryPersonnel => "assign_delivery_personnel",
    SchedulePickup => "schedule_pickup",
    ViewLogisticsReport => "view_logistics_report",

    // CRM
    ViewCrmModule => "view_crm",
    AddNewCustomer => "add_new_customer",
    EditCustomerInformation => "edit_customer_information",
    DeleteCustomer => "delete_customer",
    TrackCustomerInteraction => "track_customer_interaction",
    AssignSalesRepresentative => "assign_sales_representative",
    ViewCustomerFeedback => "view_customer_feedback",
    GenerateQuote => "generate_quote",
    EditQuote => "edit_quote",
    ChangeQuoteStatus => "change_quote_status",
    DeleteQuote => "delete_quote",
    GenerateCrmReports => "generate_crm_reports",

    // Air & Sea Operations
    ViewAirSeaOperationsModule => "view_air_sea_operations",
    CreateShipmentJobFile => "create_shipment_job_file",
    UploadDocuments => "upload_documents",
    DeleteJobFile => "delete_job_file",
    DeleteDocument => "delete_document",
    GenerateOperationsInvoice => "generate_operations_invoice",
    CloseJobFile => "close_job_file",
    GenerateOperationsReport => "generate_operations_report",

    // Pricing & Quotation
    ViewPricingQuotationModule => "view_pricing_quotation",
    AddPricingCustomer => "add_pricing_customer",
    EditPricingCustomerInfo => "edit_pricing_customer_info",
    DeletePricingCustomer => "delete_pricing_customer",
    AssignPricingSalesRep => "assign_pricing_sales_rep",
    GeneratePricingQuote => "generate_pricing_quote",
    EditPricingQuote => "edit_pricing_quote",
    ChangePricingQuoteStatus => "change_pricing_quote_status",
    DeletePricingQuote => "delete_pricing_quote",
    GenerateQuoteSummaryReports => "generate_quote_summary_reports",
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a batch of wire tokens, collecting *all* offending tokens.
///
/// Duplicates collapse. The error carries every invalid token verbatim so
/// callers can surface the complete list in one response.
pub fn parse_permissions<'a, I>(tokens: I) -> Result<HashSet<Permission>, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parsed = HashSet::new();
    let mut invalid = Vec::new();

    for token in tokens {
        match token.parse::<Permission>() {
            Ok(permission) => {
                parsed.insert(permission);
            }
            Err(UnknownPermission(t)) => invalid.push(t),
        }
    }

    if invalid.is_empty() {
        Ok(parsed)
    } else {
        Err(invalid)
    }
}

/// Organizational department.
///
/// Wire names are the exact display strings persisted on user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Fleet")]
    Fleet,
    #[serde(rename = "Finance")]
    Finance,
    #[serde(rename = "Logistics")]
    Logistics,
    #[serde(rename = "CRM")]
    Crm,
    #[serde(rename = "Air & Sea Operations")]
    AirSeaOperations,
    #[serde(rename = "Pricing & Quotation")]
    PricingQuotation,
}

impl Department {
    pub const ALL: &'static [Department] = &[
        Department::Fleet,
        Department::Finance,
        Department::Logistics,
        Department::Crm,
        Department::AirSeaOperations,
        Department::PricingQuotation,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Department::Fleet => "Fleet",
            Department::Finance => "Finance",
            Department::Logistics => "Logistics",
            Department::Crm => "CRM",
            Department::AirSeaOperations => "Air & Sea Operations",
            Department::PricingQuotation => "Pricing & Quotation",
        }
    }

    /// Default permission subset for this department (its own view token).
    pub const fn default_permissions(&self) -> &'static [Permission] {
        match self {
            Department::Fleet => &[Permission::ViewFleetModule],
            Department::Finance => &[Permission::ViewFinanceModule],
            Department::Logistics => &[Permission::ViewLogisticsModule],
            Department::Crm => &[Permission::ViewCrmModule],
            Department::AirSeaOperations => &[Permission::ViewAirSeaOperationsModule],
            Department::PricingQuotation => &[Permission::ViewPricingQuotationModule],
        }
    }
}

impl core::fmt::Display for Department {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .iter()
            .find(|d| d.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}

/// Default permission subset for a department.
pub fn defaults_for(department: Department) -> &'static [Permission] {
    department.default_permissions()
}
