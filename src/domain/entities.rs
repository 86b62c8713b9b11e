//! Business records mirrored from the REST API.
//!
//! Every typed record keeps fields it does not know about in `extra`, so a
//! record fetched from the server can be edited and sent back without losing
//! data. `id` is omitted from the body while empty, which lets the same type
//! serve as create payload (`POST`) and update payload (`PUT`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// 沒有專屬型別的實體使用的通用記錄
pub type Record = Map<String, Value>;

macro_rules! entities {
    ($( $variant:ident => $segment:literal, $slug:literal; )+) => {
        /// REST resources exposed under `/api/{segment}`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Entity {
            $( $variant, )+
        }

        impl Entity {
            pub const ALL: &'static [Entity] = &[ $( Entity::$variant, )+ ];

            /// Path segment as spelled by the server
            pub fn segment(self) -> &'static str {
                match self {
                    $( Entity::$variant => $segment, )+
                }
            }

            /// Name used on the command line
            pub fn slug(self) -> &'static str {
                match self {
                    $( Entity::$variant => $slug, )+
                }
            }
        }
    };
}

entities! {
    Baby => "Baby", "baby";
    CarePackage => "CarePackage", "care-package";
    CareProject => "CareProject", "care-project";
    Contract => "Contract", "contract";
    Customer => "Customer", "customer";
    CustomerAssessment => "CustomerAssessment", "customer-assessment";
    CustomerCall => "CustomerCall", "customer-call";
    CustomerCheckin => "CustomerCheckin", "checkin";
    CustomerEducation => "CustomerEducation", "customer-education";
    CustomerExtraTerms => "CustomerExtraTerms", "clause";
    CustomerFeedback => "CustomerFeedback", "customer-feedback";
    CustomerFoodTaboo => "CustomerFoodTaboo", "diet";
    CustomerLeave => "CustomerLeave", "leave";
    CustomerMealOrder => "CustomerMealOrder", "meal-order";
    CustomerVisit => "CustomerVisit", "visit";
    DailyCheck => "DailyVisirecord", "daily-check";
    Department => "Department", "department";
    DoctorRoundRecord => "DoctorRoundRecord", "doctor-round";
    EmployeeHealthCert => "EmployeeHealthCert", "health-cert";
    Employee => "Employees", "employee";
    FormFields => "FormFields", "form-fields";
    FrontdeskAppointment => "FrondeskAppointment", "appointment";
    MaintenanceRecord => "MaintenanceRecord", "maintenance";
    MarketingScript => "MarketingScript", "marketing-script";
    Material => "Material", "material";
    MaterialCategory => "MaterialCategory", "material-category";
    MealSample => "MealSampleRecord", "meal-sample";
    Payment => "Payment", "payment";
    RepairRecord => "RepairRecord", "repair";
    Role => "Role", "role";
    Room => "Room", "room";
    RoomType => "RoomType", "room-type";
    SafetyHazardReport => "SafetyHazardReport", "hazard-report";
    SafetyProject => "SafetyProject", "safety-project";
    SalesLead => "SalesLead", "sales-lead";
    SecurityPatrol => "SecurityPatrolRecord", "security-patrol";
    SecurityRoute => "SecurityRoute", "security-route";
    WorkflowConditionTemplate => "WorkflowConditionTemplate", "workflow-template";
}

impl Entity {
    pub fn list_path(self) -> String {
        format!("/api/{}/list", self.segment())
    }

    pub fn item_path(self, id: &str) -> String {
        format!("/api/{}/{}", self.segment(), id)
    }

    pub fn collection_path(self) -> String {
        format!("/api/{}", self.segment())
    }

    /// 部門刪除時 id 放在請求體
    pub fn deletes_by_body(self) -> bool {
        matches!(self, Entity::Department)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Entity::ALL
            .iter()
            .copied()
            .find(|e| e.slug() == wanted || e.segment().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Entity::ALL.iter().map(|e| e.slug()).collect();
                format!("unknown entity '{}'; known: {}", wanted, known.join(", "))
            })
    }
}

/// 有固定型別的實體
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    const ENTITY: Entity;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub customer_name: String,
    /// 1 男 / 2 女 / 3 未知 (列表中以文字回傳)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wechat: Option<String>,
    /// 1 意向 / 2 已入住 / 3 已出所
    #[serde(default)]
    pub customer_status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_hospital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_employees_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Customer {
    const ENTITY: Entity = Entity::Customer;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baby {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub t_customer_id: String,
    #[serde(default)]
    pub t_contract_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_no: Option<String>,
    pub baby_name: String,
    #[serde(default)]
    pub baby_gender: i32,
    #[serde(default)]
    pub baby_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Baby {
    const ENTITY: Entity = Entity::Baby;
}

/// 合約欄位在後端是全小寫
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub contractnumber: String,
    #[serde(default)]
    pub tcustomerid: String,
    #[serde(default)]
    pub customername: String,
    #[serde(default)]
    pub idnumber: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonenumber: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expectedcheckintime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packagedays: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roomtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originalprice: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discountedprice: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depositamount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpaidamount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Contract {
    const ENTITY: Entity = Entity::Contract;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub room_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub room_type_id: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Room {
    const ENTITY: Entity = Entity::Room;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for RoomType {
    const ENTITY: Entity = Entity::RoomType;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub t_contract_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub payment_type: i32,
    #[serde(default)]
    pub payment_category: i32,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: i32,
    #[serde(default)]
    pub payment_status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,
    #[serde(default)]
    pub invoice_status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Payment {
    const ENTITY: Entity = Entity::Payment;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesLead {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_no: Option<String>,
    #[serde(default)]
    pub lead_source: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_status: Option<i32>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_wechat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_converted: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for SalesLead {
    const ENTITY: Entity = Entity::SalesLead;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub dept_code: String,
    pub dept_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_id: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Department {
    const ENTITY: Entity = Entity::Department;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub employees_name: String,
    #[serde(default)]
    pub employee_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Employee {
    const ENTITY: Entity = Entity::Employee;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub role_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Resource for Role {
    const ENTITY: Entity = Entity::Role;
}

/// 門店 (只有 `/api/Branch/all`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub branch_code: String,
    pub branch_name: String,
}
