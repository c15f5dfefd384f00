/// 学习者输入事件。
///
/// 说明：
/// - `Session`/processor 只关心“语义事件”，不关心键盘与输入法。
/// - 罗马字转假名由 UI 层负责；这里收到的是假名（平假名会被规范成片假名）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 回车提交一段读音
    Submit(String),
    /// 放弃本题，直接要下一题
    Skip,
}

/// 会话输出动作（对 UI/宿主的“副作用”请求）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 有新词素被揭示：UI 应清空输入框
    Accepted,
    /// 没有任何候选能接受这段读音
    Rejected,
    /// 本题刚刚完成
    Completed,
    /// 请求下一题
    RequestNextQuestion,
}
