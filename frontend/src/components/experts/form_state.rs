//! 咨询表单状态
//!
//! 恰好一个专家、恰好一个报告、可选留言；再次选择会替换之前的选择。
//! 纯数据结构，由页面包在一个 `RwSignal` 里。

use crate::error::ApiError;
use plantdoc_shared::CreateAdviceRequest;

pub const MISSING_SELECTION: &str = "Please select both an expert and a report.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdviceForm {
    pub expert: Option<String>,
    pub report: Option<String>,
    pub message: String,
}

impl AdviceForm {
    pub fn select_expert(&mut self, id: &str) {
        self.expert = Some(id.to_string());
    }

    pub fn select_report(&mut self, id: &str) {
        self.report = Some(id.to_string());
    }

    pub fn is_complete(&self) -> bool {
        self.expert.is_some() && self.report.is_some()
    }

    /// 重置表单到初始状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 转换为提交请求；缺少选择时返回校验错误
    pub fn to_request(&self) -> Result<CreateAdviceRequest, ApiError> {
        match (&self.expert, &self.report) {
            (Some(expert_id), Some(report_id)) => Ok(CreateAdviceRequest {
                expert_id: expert_id.clone(),
                report_id: report_id.clone(),
                message: self.message.trim().to_string(),
            }),
            _ => Err(ApiError::Validation(MISSING_SELECTION.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_replaces_previous() {
        let mut form = AdviceForm::default();
        form.select_expert("e1");
        form.select_expert("e2");
        form.select_report("r1");
        assert_eq!(form.expert.as_deref(), Some("e2"));
        assert!(form.is_complete());
    }

    #[test]
    fn test_missing_selection_is_rejected() {
        let mut form = AdviceForm::default();
        form.select_report("r1");
        assert_eq!(
            form.to_request(),
            Err(ApiError::Validation(MISSING_SELECTION.to_string()))
        );
    }

    #[test]
    fn test_to_request_and_reset() {
        let mut form = AdviceForm::default();
        form.select_expert("e1");
        form.select_report("r1");
        form.message = "  Leaves are curling  ".to_string();

        let request = form.to_request().unwrap();
        assert_eq!(request.expert_id, "e1");
        assert_eq!(request.report_id, "r1");
        assert_eq!(request.message, "Leaves are curling");

        form.reset();
        assert_eq!(form, AdviceForm::default());
    }
}
