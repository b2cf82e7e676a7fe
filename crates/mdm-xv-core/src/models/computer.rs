use serde::{Deserialize, Serialize};

/// Response from `GET /api/v1/computers-inventory`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputerInventoryResponse {
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<i64>,
    #[serde(default)]
    pub results: Vec<Computer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Computer {
    pub id: Option<String>,
    pub general: Option<General>,
    pub hardware: Option<Hardware>,
    #[serde(rename = "operatingSystem")]
    pub operating_system: Option<OperatingSystem>,
    #[serde(rename = "diskEncryption")]
    pub disk_encryption: Option<DiskEncryption>,
    #[serde(rename = "userAndLocation")]
    pub user_and_location: Option<UserAndLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct General {
    pub name: Option<String>,
    #[serde(rename = "lastContactTime")]
    pub last_contact_time: Option<String>,
    #[serde(rename = "reportDate")]
    pub report_date: Option<String>,
    #[serde(rename = "lastEnrolledDate")]
    pub last_enrolled_date: Option<String>,
    #[serde(rename = "remoteManagement")]
    pub remote_management: Option<RemoteManagement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteManagement {
    pub managed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hardware {
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "totalRamMegabytes")]
    pub total_ram_megabytes: Option<i64>,
    #[serde(rename = "macAddress")]
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingSystem {
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskEncryption {
    #[serde(rename = "fileVault2Enabled")]
    pub file_vault2_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAndLocation {
    pub email: Option<String>,
}

impl Computer {
    pub fn name(&self) -> Option<&str> {
        self.general.as_ref()?.name.as_deref()
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.hardware.as_ref()?.serial_number.as_deref()
    }

    pub fn is_managed(&self) -> Option<bool> {
        self.general.as_ref()?.remote_management.as_ref()?.managed
    }

    pub fn model(&self) -> Option<&str> {
        self.hardware.as_ref()?.model.as_deref()
    }

    pub fn os_version(&self) -> Option<&str> {
        self.operating_system.as_ref()?.version.as_deref()
    }

    pub fn last_contact_time(&self) -> Option<&str> {
        self.general.as_ref()?.last_contact_time.as_deref()
    }

    pub fn report_date(&self) -> Option<&str> {
        self.general.as_ref()?.report_date.as_deref()
    }

    pub fn last_enrolled_date(&self) -> Option<&str> {
        self.general.as_ref()?.last_enrolled_date.as_deref()
    }

    pub fn total_ram_megabytes(&self) -> Option<i64> {
        self.hardware.as_ref()?.total_ram_megabytes
    }

    pub fn mac_address(&self) -> Option<&str> {
        self.hardware.as_ref()?.mac_address.as_deref()
    }

    /// FileVault 2 state; `None` when the section was not returned
    pub fn file_vault_enabled(&self) -> Option<bool> {
        self.disk_encryption.as_ref()?.file_vault2_enabled
    }

    pub fn email(&self) -> Option<&str> {
        self.user_and_location.as_ref()?.email.as_deref()
    }
}
